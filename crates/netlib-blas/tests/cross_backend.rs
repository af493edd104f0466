//! Every backend agrees with the reference backend

mod common;

use common::{all_backends, assert_all_close, assert_close, reference, sample};

const TOLERANCE: f64 = 1e-10;

/// (n, incx, incy, offx, offy)
const VECTOR_CASES: [(i32, i32, i32, usize, usize); 6] = [
    (0, 1, 1, 0, 0),
    (1, 1, 1, 0, 0),
    (7, 1, 1, 0, 0),
    (33, 1, 1, 3, 5),
    (17, 2, -3, 1, 0),
    (12, -1, -2, 4, 2),
];

fn span(n: i32, inc: i32, offset: usize) -> usize {
    offset + (n.max(1) as usize - 1) * inc.unsigned_abs() as usize + 1
}

#[test]
fn level_one_reductions_match_reference() -> netlib_core::Result<()> {
    let expected = reference();
    for blas in all_backends() {
        for (n, incx, incy, offx, offy) in VECTOR_CASES {
            let x = sample(span(n, incx, offx), 1);
            let y = sample(span(n, incy, offy), 2);

            assert_close(
                blas.dot_at(n, Some(&x[..]), offx, incx, Some(&y[..]), offy, incy)?,
                expected.dot_at(n, Some(&x[..]), offx, incx, Some(&y[..]), offy, incy)?,
                TOLERANCE,
            );
            let inc = incx.abs();
            assert_close(
                blas.asum_at(n, Some(&x[..]), offx, inc)?,
                expected.asum_at(n, Some(&x[..]), offx, inc)?,
                TOLERANCE,
            );
            assert_close(
                blas.nrm2_at(n, Some(&x[..]), offx, inc)?,
                expected.nrm2_at(n, Some(&x[..]), offx, inc)?,
                TOLERANCE,
            );
            assert_eq!(
                blas.iamax_at(n, Some(&x[..]), offx, inc)?,
                expected.iamax_at(n, Some(&x[..]), offx, inc)?,
                "{} iamax n={n}",
                blas.name()
            );
        }
    }
    Ok(())
}

#[test]
fn level_one_updates_match_reference() -> netlib_core::Result<()> {
    let expected = reference();
    for blas in all_backends() {
        for (n, incx, incy, offx, offy) in VECTOR_CASES {
            let x = sample(span(n, incx, offx), 3);
            let y0 = sample(span(n, incy, offy), 4);

            let mut y = y0.clone();
            let mut want = y0.clone();
            blas.axpy_at(n, -0.75, Some(&x[..]), offx, incx, Some(&mut y[..]), offy, incy)?;
            expected.axpy_at(n, -0.75, Some(&x[..]), offx, incx, Some(&mut want[..]), offy, incy)?;
            assert_all_close(&y, &want, TOLERANCE);

            let inc = incy.abs();
            let mut y = y0.clone();
            let mut want = y0.clone();
            blas.scal_at(n, 1.5, Some(&mut y[..]), offy, inc)?;
            expected.scal_at(n, 1.5, Some(&mut want[..]), offy, inc)?;
            assert_all_close(&y, &want, TOLERANCE);

            let mut y = y0.clone();
            let mut want = y0;
            blas.copy_at(n, Some(&x[..]), offx, incx, Some(&mut y[..]), offy, incy)?;
            expected.copy_at(n, Some(&x[..]), offx, incx, Some(&mut want[..]), offy, incy)?;
            assert_eq!(y, want);
        }
    }
    Ok(())
}

#[test]
fn gemv_matches_reference() -> netlib_core::Result<()> {
    let expected = reference();
    for blas in all_backends() {
        for trans in ["N", "T"] {
            for (m, n, incx, incy, beta) in [(5, 3, 1, 1, 0.0), (4, 9, 2, -1, 0.5), (16, 16, -3, 2, 1.0)] {
                let lda = m + 2;
                let a = sample((lda * n) as usize, 5);
                let (lenx, leny) = if trans == "N" { (n, m) } else { (m, n) };
                let x = sample(span(lenx, incx, 1), 6);
                let y0 = sample(span(leny, incy, 0), 7);

                let mut y = y0.clone();
                let mut want = y0;
                blas.gemv_at(trans, m, n, 1.25, Some(&a[..]), 0, lda, Some(&x[..]), 1, incx, beta, Some(&mut y[..]), 0, incy)?;
                expected.gemv_at(
                    trans,
                    m,
                    n,
                    1.25,
                    Some(&a[..]),
                    0,
                    lda,
                    Some(&x[..]),
                    1,
                    incx,
                    beta,
                    Some(&mut want[..]),
                    0,
                    incy,
                )?;
                assert_all_close(&y, &want, TOLERANCE);
            }
        }
    }
    Ok(())
}

#[test]
fn gemm_matches_reference() -> netlib_core::Result<()> {
    let expected = reference();
    for blas in all_backends() {
        for transa in ["N", "T"] {
            for transb in ["N", "T"] {
                for (m, n, k, beta) in [(3, 4, 5, 0.0), (8, 2, 7, -1.0), (17, 13, 9, 0.5)] {
                    let (ra, ca) = if transa == "N" { (m, k) } else { (k, m) };
                    let (rb, cb) = if transb == "N" { (k, n) } else { (n, k) };
                    let (lda, ldb, ldc) = (ra + 1, rb, m + 3);
                    let a = sample((lda * ca) as usize, 8);
                    let b = sample((ldb * cb) as usize, 9);
                    let c0 = sample((ldc * n) as usize, 10);

                    let mut c = c0.clone();
                    let mut want = c0;
                    blas.gemm(transa, transb, m, n, k, 0.5, &a, lda, &b, ldb, beta, &mut c, ldc)?;
                    expected.gemm(transa, transb, m, n, k, 0.5, &a, lda, &b, ldb, beta, &mut want, ldc)?;
                    assert_all_close(&c, &want, TOLERANCE);
                }
            }
        }
    }
    Ok(())
}

#[test]
fn large_gemm_matches_reference() -> netlib_core::Result<()> {
    // Big enough to take the parallel path of the SIMD backend
    let (m, n, k) = (96, 96, 64);
    let a = sample(m * k, 11);
    let b = sample(k * n, 12);
    let mut want = vec![0.0; m * n];
    reference().gemm("N", "N", m as i32, n as i32, k as i32, 1.0, &a, m as i32, &b, k as i32, 0.0, &mut want, m as i32)?;

    for blas in all_backends() {
        let mut c = vec![0.0; m * n];
        blas.gemm("N", "N", m as i32, n as i32, k as i32, 1.0, &a, m as i32, &b, k as i32, 0.0, &mut c, m as i32)?;
        assert_all_close(&c, &want, 1e-9);
    }
    Ok(())
}

#[test]
fn triangular_and_symmetric_match_reference() -> netlib_core::Result<()> {
    let expected = reference();
    let n = 6;
    // Diagonally dominant so the solves are well conditioned
    let mut a = sample(n * n, 13);
    for i in 0..n {
        a[i + i * n] += 8.0;
    }

    for blas in all_backends() {
        for uplo in ["U", "L"] {
            for trans in ["N", "T"] {
                for diag in ["N", "U"] {
                    let x0 = sample(n, 14);
                    let mut x = x0.clone();
                    let mut want = x0;
                    blas.trsv(uplo, trans, diag, n as i32, &a, n as i32, &mut x, 1)?;
                    expected.trsv(uplo, trans, diag, n as i32, &a, n as i32, &mut want, 1)?;
                    assert_all_close(&x, &want, TOLERANCE);
                }
            }

            let x = sample(n, 15);
            let mut y = sample(n, 16);
            let mut want = y.clone();
            blas.symv(uplo, n as i32, 2.0, &a, n as i32, &x, 1, 0.5, &mut y, 1)?;
            expected.symv(uplo, n as i32, 2.0, &a, n as i32, &x, 1, 0.5, &mut want, 1)?;
            assert_all_close(&y, &want, TOLERANCE);

            for side in ["L", "R"] {
                let (m, cols) = (n, 3);
                let b0 = sample(m * cols, 17);
                let (bm, bn) = if side == "L" { (m, cols) } else { (cols, m) };
                let mut b = b0[..bm * bn].to_vec();
                let mut want = b.clone();
                blas.trsm(side, uplo, "N", "N", bm as i32, bn as i32, 1.5, &a, n as i32, &mut b, bm as i32)?;
                expected.trsm(side, uplo, "N", "N", bm as i32, bn as i32, 1.5, &a, n as i32, &mut want, bm as i32)?;
                assert_all_close(&b, &want, TOLERANCE);
            }
        }
    }
    Ok(())
}
