//! The ARPACK utility routines through the facade

mod common;

use std::f64::consts::FRAC_1_SQRT_2;

use common::{assert_all_close, reference};

#[test]
fn sconv_counts_converged_values() -> netlib_core::Result<()> {
    let arpack = reference();
    let ritz = [10.0, 1.0, 0.0, -4.0];
    let bounds = [1e-6, 1e-6, 1e-12, 1e-3];
    assert_eq!(arpack.sconv(4, &ritz, &bounds, 1e-6)?, 2);
    assert_eq!(arpack.sconv(2, &ritz, &bounds, 1e-6)?, 2);
    // A zero Ritz value is only measured against the eps^(2/3) floor
    assert_eq!(arpack.sconv(4, &ritz, &bounds, 1e-3)?, 3);

    let ritz = [2.0_f32, 3.0];
    let bounds = [1e-5_f32, 1.0];
    assert_eq!(arpack.sconv(2, &ritz, &bounds, 1e-4)?, 1);
    Ok(())
}

#[test]
fn sortr_puts_wanted_values_last() -> netlib_core::Result<()> {
    let arpack = reference();

    let mut x1 = [3.0, 1.0, 2.0];
    let mut x2 = [30.0, 10.0, 20.0];
    arpack.sortr("LA", true, 3, &mut x1, &mut x2)?;
    assert_eq!(x1, [1.0, 2.0, 3.0]);
    assert_eq!(x2, [10.0, 20.0, 30.0]);

    let mut x1 = [1.0, 3.0, 2.0];
    let mut x2 = [0.0; 3];
    arpack.sortr("SA", false, 3, &mut x1, &mut x2)?;
    assert_eq!(x1, [3.0, 2.0, 1.0]);
    assert_eq!(x2, [0.0; 3]);

    let mut x1 = [-3.0, 1.0, 2.0];
    let mut x2 = [1.0, 2.0, 3.0];
    arpack.sortr("LM", true, 3, &mut x1, &mut x2)?;
    assert_eq!(x1, [1.0, 2.0, -3.0]);
    assert_eq!(x2, [2.0, 3.0, 1.0]);

    let mut x1 = [0.5, -4.0, 2.0];
    arpack.sortr("sm", false, 3, &mut x1, &mut [])?;
    assert_eq!(x1, [-4.0, 2.0, 0.5]);
    Ok(())
}

#[test]
fn sortr_respects_the_count() -> netlib_core::Result<()> {
    let arpack = reference();
    let mut x1 = [3.0, 2.0, 1.0, 0.0];
    arpack.sortr("LA", false, 3, &mut x1, &mut [])?;
    assert_eq!(x1, [1.0, 2.0, 3.0, 0.0]);
    Ok(())
}

#[test]
fn sesrt_permutes_matrix_columns() -> netlib_core::Result<()> {
    let arpack = reference();
    let mut x = [1.0, 3.0, 2.0];
    // 2 x 3 with a padding row, lda = 3
    let mut a = [1.0, 1.0, 9.0, 3.0, 3.0, 9.0, 2.0, 2.0, 9.0];
    arpack.sesrt("SA", true, 3, &mut x, 2, &mut a, 3)?;
    assert_eq!(x, [3.0, 2.0, 1.0]);
    assert_eq!(a, [3.0, 3.0, 9.0, 2.0, 2.0, 9.0, 1.0, 1.0, 9.0]);

    let mut x = [1.0, 3.0, 2.0];
    arpack.sesrt_at::<f64>("LA", true, 3, Some(&mut x[..]), 0, 0, None, 0, 1)?;
    assert_eq!(x, [1.0, 2.0, 3.0]);
    Ok(())
}

#[test]
fn stqrb_solves_a_small_tridiagonal() -> netlib_core::Result<()> {
    let arpack = reference();
    let sqrt2 = 2.0_f64.sqrt();
    let mut d = [2.0, 2.0, 2.0];
    let mut e = [-1.0, -1.0];
    let mut z = [0.0; 3];
    let mut work = [0.0; 4];
    assert_eq!(arpack.stqrb(3, &mut d, &mut e, &mut z, &mut work)?, 0);
    assert_all_close(&d, &[2.0 - sqrt2, 2.0, 2.0 + sqrt2], 1e-12);

    let magnitudes: Vec<f64> = z.iter().map(|value| value.abs()).collect();
    assert_all_close(&magnitudes, &[0.5, FRAC_1_SQRT_2, 0.5], 1e-12);
    Ok(())
}

#[test]
fn stqrb_single_element() -> netlib_core::Result<()> {
    let arpack = reference();
    let mut d = [5.0_f32];
    let mut z = [0.0_f32];
    let mut work = [0.0_f32];
    assert_eq!(arpack.stqrb(1, &mut d, &mut [], &mut z, &mut work)?, 0);
    assert_eq!((d, z), ([5.0], [1.0]));
    Ok(())
}

#[test]
fn stqrb_needs_room_for_its_work() {
    let arpack = reference();
    let mut d = [2.0, 2.0, 2.0];
    let mut e = [-1.0, -1.0];
    let mut z = [0.0; 3];
    let mut work = [0.0; 3];
    assert_eq!(
        arpack.stqrb(3, &mut d, &mut e, &mut z, &mut work),
        Err(netlib_core::NetlibError::out_of_bounds(3, 3))
    );
    assert_eq!(d, [2.0, 2.0, 2.0]);
}

#[test]
fn integer_routines_follow_their_strides() -> netlib_core::Result<()> {
    let arpack = reference();

    let array = [4, 1, 4, 2, 4];
    assert_eq!(arpack.icnteq(5, &array, 4)?, 3);
    assert_eq!(arpack.icnteq(2, &array, 4)?, 1);

    let source = [1, 2, 3];
    let mut target = [0; 5];
    arpack.icopy(3, &source, 1, &mut target, 2)?;
    assert_eq!(target, [1, 0, 2, 0, 3]);

    // A negative stride walks the buffer from its far end
    let mut reversed = [0; 3];
    arpack.icopy(3, &source, 1, &mut reversed, -1)?;
    assert_eq!(reversed, [3, 2, 1]);

    let mut array = [0; 6];
    arpack.iset(3, 7, &mut array, 2)?;
    assert_eq!(array, [7, 0, 7, 0, 7, 0]);

    let mut sx = [1, 2, 3];
    let mut sy = [4, 0, 5, 0, 6];
    arpack.iswap(3, &mut sx, 1, &mut sy, 2)?;
    assert_eq!(sx, [4, 5, 6]);
    assert_eq!(sy, [1, 0, 2, 0, 3]);
    Ok(())
}

#[test]
fn integer_routines_with_offsets() -> netlib_core::Result<()> {
    let arpack = reference();
    let array = [9, 9, 1, 1];
    assert_eq!(arpack.icnteq_at(2, Some(&array[..]), 2, 1)?, 2);

    let mut array = [0; 4];
    arpack.iset_at(2, 3, Some(&mut array[..]), 2, 1)?;
    assert_eq!(array, [0, 0, 3, 3]);

    arpack.icopy_at(0, None, 0, 1, None, 0, 1)?;
    arpack.iswap_at(0, None, 0, 1, None, 0, 1)?;
    Ok(())
}
