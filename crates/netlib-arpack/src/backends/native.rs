//! Foreign-call bridge to a natively compiled ARPACK
//!
//! Same calling convention as the BLAS bridge: gfortran symbols, arguments by
//! reference, hidden CHARACTER lengths last. `LOGICAL` is a 4-byte integer,
//! so `select` crosses the boundary as an `i32` copy.
//!
//! ARPACK keeps its iteration state in `SAVE` variables, so one native
//! library runs a single reverse-communication loop per precision at a time.

use std::collections::HashSet;

use netlib_core::{
    CandidateError, MatrixViewMut, NativeConfig, NativeLibrary, NetlibError, Platform, Result, Routine, StridedView,
    StridedViewMut,
};

use crate::flags::{Howmny, Which};
use crate::kernel::{ArpackElement, ArpackKernel, ArpackKernels, ArpackRoutine, Capabilities, LanczosWork};

/// Fortran INTEGER
type Int = i32;
/// Fortran LOGICAL
type Logical = i32;
/// Hidden length of a CHARACTER argument
type Len = usize;
/// `BMAT` and `HOWMNY`
const FLAG_LEN: Len = 1;
/// `WHICH`
const WORD_LEN: Len = 2;

// Sizes reaching a kernel were validated from `i32` arguments.
#[inline(always)]
fn int(value: usize) -> Int {
    value as Int
}

#[inline(always)]
fn inc(value: isize) -> Int {
    value as Int
}

#[inline(always)]
fn logical(value: bool) -> Logical {
    Logical::from(value)
}

#[inline(always)]
fn present<F>(function: Option<F>, routine: Routine) -> Result<F> {
    function.ok_or(NetlibError::unsupported(routine))
}

type SaupdFn<T> = unsafe extern "C" fn(
    *mut Int, *const u8, *const Int, *const u8, *const Int, *mut T, *mut T, *const Int, *mut T, *const Int,
    *mut Int, *mut Int, *mut T, *mut T, *const Int, *mut Int, Len, Len,
);
type SeupdFn<T> = unsafe extern "C" fn(
    *const Logical, *const u8, *mut Logical, *mut T, *mut T, *const Int, *const T, *const u8, *const Int,
    *const u8, *const Int, *const T, *mut T, *const Int, *mut T, *const Int, *mut Int, *mut Int, *mut T, *mut T,
    *const Int, *mut Int, Len, Len, Len,
);
type SconvFn<T> = unsafe extern "C" fn(*const Int, *const T, *const T, *const T, *mut Int);
type SortrFn<T> = unsafe extern "C" fn(*const u8, *const Logical, *const Int, *mut T, *mut T, Len);
type SesrtFn<T> =
    unsafe extern "C" fn(*const u8, *const Logical, *const Int, *mut T, *const Int, *mut T, *const Int, Len);
type StqrbFn<T> = unsafe extern "C" fn(*const Int, *mut T, *mut T, *mut T, *mut T, *mut Int);

type IcnteqFn = unsafe extern "C" fn(*const Int, *const Int, *const Int) -> Int;
type IcopyFn = unsafe extern "C" fn(*const Int, *const Int, *const Int, *mut Int, *const Int);
type IsetFn = unsafe extern "C" fn(*const Int, *const Int, *mut Int, *const Int);
type IswapFn = unsafe extern "C" fn(*const Int, *mut Int, *const Int, *mut Int, *const Int);

/// Symbols of one precision
struct NativeTable<T> {
    saupd: Option<SaupdFn<T>>,
    seupd: Option<SeupdFn<T>>,
    sconv: Option<SconvFn<T>>,
    sortr: Option<SortrFn<T>>,
    sesrt: Option<SesrtFn<T>>,
    stqrb: Option<StqrbFn<T>>,
}

impl<T: ArpackElement> NativeTable<T> {
    fn load(library: &NativeLibrary) -> Self {
        // SAFETY: each alias is the ARPACK interface of its symbol.
        unsafe {
            Self {
                saupd: library.function(&T::routine("SAUPD").symbol()),
                seupd: library.function(&T::routine("SEUPD").symbol()),
                sconv: library.function(&T::routine("SCONV").symbol()),
                sortr: library.function(&T::routine("SORTR").symbol()),
                sesrt: library.function(&T::routine("SESRT").symbol()),
                stqrb: library.function(&T::routine("STQRB").symbol()),
            }
        }
    }
}

// SAFETY (all calls below): the facade checked every buffer against the extent
// the routine touches, so the foreign code stays inside caller-owned memory.
impl<T: ArpackElement> ArpackKernels<T> for NativeTable<T> {
    fn saupd(&self, ido: &mut i32, tol: &mut T, work: LanczosWork<'_, T>, info: &mut i32) -> Result<()> {
        let f = present(self.saupd, T::routine("SAUPD"))?;
        let LanczosWork {
            bmat,
            n,
            which,
            nev,
            resid,
            ncv,
            mut v,
            iparam,
            ipntr,
            workd,
            workl,
        } = work;
        let (b, w) = (bmat.as_char(), which.as_chars());
        let (n, nev, ncv, ldv, lworkl) = (int(n), int(nev), int(ncv), int(v.ld()), int(workl.len()));
        unsafe {
            f(
                ido,
                &b,
                &n,
                w.as_ptr(),
                &nev,
                tol,
                resid.as_mut_ptr(),
                &ncv,
                v.base_mut_ptr(),
                &ldv,
                iparam.as_mut_ptr(),
                ipntr.as_mut_ptr(),
                workd.as_mut_ptr(),
                workl.as_mut_ptr(),
                &lworkl,
                info,
                FLAG_LEN,
                WORD_LEN,
            )
        };
        Ok(())
    }

    fn seupd(
        &self,
        rvec: bool,
        howmny: Howmny,
        select: &mut [bool],
        d: &mut [T],
        mut z: MatrixViewMut<'_, T>,
        sigma: T,
        tol: T,
        work: LanczosWork<'_, T>,
        info: &mut i32,
    ) -> Result<()> {
        let f = present(self.seupd, T::routine("SEUPD"))?;
        let LanczosWork {
            bmat,
            n,
            which,
            nev,
            resid,
            ncv,
            mut v,
            iparam,
            ipntr,
            workd,
            workl,
        } = work;
        let mut flags: Vec<Logical> = select.iter().map(|&selected| logical(selected)).collect();
        let (rv, h, b, w) = (logical(rvec), howmny.as_char(), bmat.as_char(), which.as_chars());
        let (n, nev, ncv) = (int(n), int(nev), int(ncv));
        let (ldz, ldv, lworkl) = (int(z.ld().max(1)), int(v.ld()), int(workl.len()));
        unsafe {
            f(
                &rv,
                &h,
                flags.as_mut_ptr(),
                d.as_mut_ptr(),
                z.base_mut_ptr(),
                &ldz,
                &sigma,
                &b,
                &n,
                w.as_ptr(),
                &nev,
                &tol,
                resid.as_mut_ptr(),
                &ncv,
                v.base_mut_ptr(),
                &ldv,
                iparam.as_mut_ptr(),
                ipntr.as_mut_ptr(),
                workd.as_mut_ptr(),
                workl.as_mut_ptr(),
                &lworkl,
                info,
                FLAG_LEN,
                FLAG_LEN,
                WORD_LEN,
            )
        };
        for (selected, flag) in select.iter_mut().zip(flags) {
            *selected = flag != 0;
        }
        Ok(())
    }

    fn sconv(&self, ritz: &[T], bounds: &[T], tol: T) -> Result<usize> {
        let f = present(self.sconv, T::routine("SCONV"))?;
        let n = int(ritz.len());
        let mut nconv: Int = 0;
        unsafe { f(&n, ritz.as_ptr(), bounds.as_ptr(), &tol, &mut nconv) };
        Ok(usize::try_from(nconv).unwrap_or(0))
    }

    fn sortr(&self, which: Which, apply: bool, x1: &mut [T], x2: &mut [T]) -> Result<()> {
        let f = present(self.sortr, T::routine("SORTR"))?;
        let (w, apply, n) = (which.as_chars(), logical(apply), int(x1.len()));
        unsafe { f(w.as_ptr(), &apply, &n, x1.as_mut_ptr(), x2.as_mut_ptr(), WORD_LEN) };
        Ok(())
    }

    fn sesrt(&self, which: Which, apply: bool, x: &mut [T], mut a: MatrixViewMut<'_, T>) -> Result<()> {
        let f = present(self.sesrt, T::routine("SESRT"))?;
        let (w, apply) = (which.as_chars(), logical(apply));
        // Fortran's N is the number of values; NA the rows of A
        let (n, na, lda) = (int(x.len()), int(a.rows()), int(a.ld().max(1)));
        unsafe { f(w.as_ptr(), &apply, &n, x.as_mut_ptr(), &na, a.base_mut_ptr(), &lda, WORD_LEN) };
        Ok(())
    }

    fn stqrb(&self, d: &mut [T], e: &mut [T], z: &mut [T], work: &mut [T]) -> Result<i32> {
        let f = present(self.stqrb, T::routine("STQRB"))?;
        let n = int(d.len());
        let mut info: Int = 0;
        unsafe { f(&n, d.as_mut_ptr(), e.as_mut_ptr(), z.as_mut_ptr(), work.as_mut_ptr(), &mut info) };
        Ok(info)
    }
}

/// ARPACK reached through a loaded shared library
pub struct NativeBridgeArpack {
    name: &'static str,
    double: NativeTable<f64>,
    single: NativeTable<f32>,
    icnteq: Option<IcnteqFn>,
    icopy: Option<IcopyFn>,
    iset: Option<IsetFn>,
    iswap: Option<IswapFn>,
    exported: HashSet<ArpackRoutine>,
    // Declared last so the symbol tables above never outlive the mapping.
    library: NativeLibrary,
}

impl NativeBridgeArpack {
    /// The library bundled under the resource tree for this platform
    #[tracing::instrument(skip(config), fields(resources = %config.resources_dir.display()))]
    pub fn bundled(config: &NativeConfig) -> std::result::Result<Self, CandidateError> {
        config.ensure_native_allowed()?;
        let library =
            NativeLibrary::materialize(&config.resources_dir, &Platform::current(), &config.bundled_file_name())?;
        Self::from_library("native", library)
    }

    /// Bind every ARPACK symbol `library` exports.
    ///
    /// Fails only when the library exports none of them.
    pub fn from_library(name: &'static str, library: NativeLibrary) -> std::result::Result<Self, CandidateError> {
        let exported: HashSet<ArpackRoutine> = ArpackRoutine::ALL
            .iter()
            .copied()
            .filter(|routine| {
                // SAFETY: the pointer is only tested for presence, never called.
                unsafe { library.function::<unsafe extern "C" fn()>(&routine.routine().symbol()) }.is_some()
            })
            .collect();

        if exported.is_empty() {
            return Err(CandidateError::EmptyLibrary {
                library: library.origin().display().to_string(),
            });
        }

        let missing = ArpackRoutine::ALL.len() - exported.len();
        if missing > 0 {
            tracing::debug!(
                library = %library.origin().display(),
                missing,
                "Native library lacks some ARPACK routines"
            );
        }

        // SAFETY: the aliases are the ARPACK interfaces of the integer utilities.
        let (icnteq, icopy, iset, iswap) = unsafe {
            (
                library.function::<IcnteqFn>(&ArpackRoutine::Icnteq.routine().symbol()),
                library.function::<IcopyFn>(&ArpackRoutine::Icopy.routine().symbol()),
                library.function::<IsetFn>(&ArpackRoutine::Iset.routine().symbol()),
                library.function::<IswapFn>(&ArpackRoutine::Iswap.routine().symbol()),
            )
        };

        Ok(Self {
            name,
            double: NativeTable::load(&library),
            single: NativeTable::load(&library),
            icnteq,
            icopy,
            iset,
            iswap,
            exported,
            library,
        })
    }

    /// Where the library was loaded from
    pub fn origin(&self) -> &std::path::Path {
        self.library.origin()
    }
}

impl std::fmt::Debug for NativeBridgeArpack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeBridgeArpack")
            .field("name", &self.name)
            .field("origin", &self.library.origin())
            .field("exported", &self.exported.len())
            .finish()
    }
}

impl Capabilities for NativeBridgeArpack {
    fn has(&self, routine: ArpackRoutine) -> bool {
        self.exported.contains(&routine)
    }
}

impl ArpackKernel for NativeBridgeArpack {
    fn name(&self) -> &'static str {
        self.name
    }

    fn f64_kernels(&self) -> &dyn ArpackKernels<f64> {
        &self.double
    }

    fn f32_kernels(&self) -> &dyn ArpackKernels<f32> {
        &self.single
    }

    fn icnteq(&self, array: StridedView<'_, i32>, value: i32) -> Result<usize> {
        let f = present(self.icnteq, ArpackRoutine::Icnteq.routine())?;
        let n = int(array.len());
        // SAFETY: `array` holds `n` contiguous elements.
        let count = unsafe { f(&n, array.base_ptr(), &value) };
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn icopy(&self, x: StridedView<'_, i32>, mut y: StridedViewMut<'_, i32>) -> Result<()> {
        let f = present(self.icopy, ArpackRoutine::Icopy.routine())?;
        let (n, incx, incy) = (int(y.len()), inc(x.inc()), inc(y.inc()));
        // SAFETY: both views were bounds-checked for `n` elements.
        unsafe { f(&n, x.base_ptr(), &incx, y.base_mut_ptr(), &incy) };
        Ok(())
    }

    fn iset(&self, value: i32, mut array: StridedViewMut<'_, i32>) -> Result<()> {
        let f = present(self.iset, ArpackRoutine::Iset.routine())?;
        let (n, incx) = (int(array.len()), inc(array.inc()));
        // SAFETY: as above.
        unsafe { f(&n, &value, array.base_mut_ptr(), &incx) };
        Ok(())
    }

    fn iswap(&self, mut x: StridedViewMut<'_, i32>, mut y: StridedViewMut<'_, i32>) -> Result<()> {
        let f = present(self.iswap, ArpackRoutine::Iswap.routine())?;
        let (n, incx, incy) = (int(x.len()), inc(x.inc()), inc(y.inc()));
        // SAFETY: as above.
        unsafe { f(&n, x.base_mut_ptr(), &incx, y.base_mut_ptr(), &incy) };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_symbol_is_unsupported() {
        let err = present::<SconvFn<f64>>(None, Routine::new('D', "SCONV")).unwrap_err();
        assert_eq!(err, NetlibError::unsupported(Routine::new('D', "SCONV")));
    }

    #[test]
    fn logical_matches_gfortran() {
        assert_eq!(logical(true), 1);
        assert_eq!(logical(false), 0);
    }

    #[test]
    fn bundled_bridge_without_resources_fails_to_materialize() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NativeConfig::new("NETLIB_ARPACK", "libarpack.so.2", "netlib-arpack");
        config.resources_dir = dir.path().to_path_buf();
        assert!(matches!(
            NativeBridgeArpack::bundled(&config),
            Err(CandidateError::Materialize { .. })
        ));
    }

    #[test]
    fn disabled_native_fails_before_touching_disk() {
        let mut config = NativeConfig::new("NETLIB_ARPACK", "libarpack.so.2", "netlib-arpack");
        config.allow_native = false;
        assert!(matches!(
            NativeBridgeArpack::bundled(&config),
            Err(CandidateError::NativeDisabled { .. })
        ));
    }
}
