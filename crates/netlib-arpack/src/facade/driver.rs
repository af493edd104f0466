//! `saupd` and `seupd`
//!
//! With `n = 0` there is nothing to iterate on: both calls skip the buffers
//! entirely, `saupd` answers `ido = 99` at once and `info` stays 0.

use netlib_core::validate::{check_span, require_mut_if};
use netlib_core::{Contract, MatrixViewMut, Result};

use super::Arpack;
use crate::codes::{ido as request, info as status};
use crate::flags::{Bmat, Howmny, Which};
use crate::kernel::{ArpackElement, LanczosWork};

/// Entries of `iparam` and of `ipntr`
pub const PARAM_LEN: usize = 11;

/// Smallest legal `lworkl` for `ncv` Lanczos vectors
pub const fn workl_len(ncv: usize) -> usize {
    ncv.saturating_mul(ncv).saturating_add(ncv.saturating_mul(8))
}

/// Fortran positions of the arguments both drivers take
struct Positions {
    bmat: u32,
    n: u32,
    which: u32,
    nev: u32,
    ncv: u32,
    ldv: u32,
    lworkl: u32,
}

const SAUPD: Positions = Positions {
    bmat: 2,
    n: 3,
    which: 4,
    nev: 5,
    ncv: 8,
    ldv: 10,
    lworkl: 15,
};

const SEUPD: Positions = Positions {
    bmat: 8,
    n: 9,
    which: 10,
    nev: 11,
    ncv: 14,
    ldv: 16,
    lworkl: 21,
};

/// Legal scalar arguments of one driver call
#[derive(Debug, Clone, Copy)]
struct Problem {
    bmat: Bmat,
    n: usize,
    which: Which,
    nev: usize,
    ncv: usize,
    ldv: usize,
    lworkl: usize,
}

impl Problem {
    #[allow(clippy::too_many_arguments)]
    fn check(
        contract: &Contract,
        at: &Positions,
        bmat: &str,
        n: i32,
        which: &str,
        nev: i32,
        ncv: i32,
        ldv: i32,
        lworkl: i32,
    ) -> Result<Self> {
        let bmat = contract.flag(at.bmat, Bmat::parse(bmat))?;
        let n = contract.dimension(at.n, n)?;
        let which = contract.flag(at.which, Which::parse(which))?;
        contract.argument(at.nev, n == 0 || (nev > 0 && (nev as usize) < n))?;
        let ncv = contract.dimension(at.ncv, ncv)?;
        let ldv = contract.leading(at.ldv, ldv, n.max(1))?;
        let lworkl = contract.dimension(at.lworkl, lworkl)?;
        contract.argument(at.lworkl, n == 0 || lworkl >= workl_len(ncv))?;
        Ok(Self {
            bmat,
            n,
            which,
            nev: nev.max(0) as usize,
            ncv,
            ldv,
            lworkl,
        })
    }

    /// Bounds of the shared buffers, already known to be present
    #[allow(clippy::too_many_arguments)]
    fn bind<'a, T: Copy>(
        &self,
        resid: &'a mut [T],
        offresid: usize,
        v: &'a mut [T],
        offv: usize,
        iparam: &'a mut [i32],
        offiparam: usize,
        ipntr: &'a mut [i32],
        offipntr: usize,
        workd: &'a mut [T],
        offworkd: usize,
        workl: &'a mut [T],
        offworkl: usize,
    ) -> Result<LanczosWork<'a, T>> {
        Ok(LanczosWork {
            bmat: self.bmat,
            n: self.n,
            which: self.which,
            nev: self.nev,
            resid: span(resid, offresid, self.n)?,
            ncv: self.ncv,
            v: MatrixViewMut::new(v, offv, self.n, self.ncv, self.ldv)?,
            iparam: span(iparam, offiparam, PARAM_LEN)?,
            ipntr: span(ipntr, offipntr, PARAM_LEN)?,
            workd: span(workd, offworkd, 3 * self.n)?,
            workl: span(workl, offworkl, self.lworkl)?,
        })
    }
}

/// The `count` elements at `offset`, or a bounds error
fn span<T>(buffer: &mut [T], offset: usize, count: usize) -> Result<&mut [T]> {
    if count == 0 {
        return Ok(&mut []);
    }
    check_span(offset, count, buffer.len())?;
    Ok(&mut buffer[offset..offset + count])
}

impl Arpack {
    /// One step of the implicitly restarted Lanczos iteration for a symmetric
    /// `OP`.
    ///
    /// Start with `ido = 0` and call again after each request until `ido` is
    /// 99. For `ido` of -1 or 1, store `OP·x` at `workd[ipntr[1] - 1..]` for
    /// `x = workd[ipntr[0] - 1..]`; for `ido = 3`, place `iparam[7]` shifts at
    /// `workl[ipntr[10] - 1..]`.
    #[allow(clippy::too_many_arguments)]
    pub fn saupd<T: ArpackElement>(
        &self,
        ido: &mut i32,
        bmat: &str,
        n: i32,
        which: &str,
        nev: i32,
        tol: &mut T,
        resid: &mut [T],
        ncv: i32,
        v: &mut [T],
        ldv: i32,
        iparam: &mut [i32],
        ipntr: &mut [i32],
        workd: &mut [T],
        workl: &mut [T],
        lworkl: i32,
        info: &mut i32,
    ) -> Result<()> {
        self.saupd_at(
            ido,
            bmat,
            n,
            which,
            nev,
            tol,
            Some(resid),
            0,
            ncv,
            Some(v),
            0,
            ldv,
            Some(iparam),
            0,
            Some(ipntr),
            0,
            Some(workd),
            0,
            Some(workl),
            0,
            lworkl,
            info,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn saupd_at<T: ArpackElement>(
        &self,
        ido: &mut i32,
        bmat: &str,
        n: i32,
        which: &str,
        nev: i32,
        tol: &mut T,
        resid: Option<&mut [T]>,
        offresid: usize,
        ncv: i32,
        v: Option<&mut [T]>,
        offv: usize,
        ldv: i32,
        iparam: Option<&mut [i32]>,
        offiparam: usize,
        ipntr: Option<&mut [i32]>,
        offipntr: usize,
        workd: Option<&mut [T]>,
        offworkd: usize,
        workl: Option<&mut [T]>,
        offworkl: usize,
        lworkl: i32,
        info: &mut i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SAUPD"));
        let problem = Problem::check(&contract, &SAUPD, bmat, n, which, nev, ncv, ldv, lworkl)?;

        let touched = problem.n > 0;
        let resid = require_mut_if(touched, "resid", resid)?;
        let v = require_mut_if(touched, "v", v)?;
        let iparam = require_mut_if(touched, "iparam", iparam)?;
        let ipntr = require_mut_if(touched, "ipntr", ipntr)?;
        let workd = require_mut_if(touched, "workd", workd)?;
        let workl = require_mut_if(touched, "workl", workl)?;
        if !touched {
            *ido = request::DONE;
            *info = status::NORMAL;
            return Ok(());
        }

        let work = problem.bind(
            resid, offresid, v, offv, iparam, offiparam, ipntr, offipntr, workd, offworkd, workl, offworkl,
        )?;
        self.kernels::<T>().saupd(ido, tol, work, info)
    }

    /// Ritz values, and with `rvec` Ritz vectors, of a finished `saupd` run.
    ///
    /// `d` receives `iparam[4]` values in ascending order and `z` (`n x nev`)
    /// the matching vectors. `select` needs `ncv` entries.
    #[allow(clippy::too_many_arguments)]
    pub fn seupd<T: ArpackElement>(
        &self,
        rvec: bool,
        howmny: &str,
        select: &mut [bool],
        d: &mut [T],
        z: &mut [T],
        ldz: i32,
        sigma: T,
        bmat: &str,
        n: i32,
        which: &str,
        nev: i32,
        tol: T,
        resid: &mut [T],
        ncv: i32,
        v: &mut [T],
        ldv: i32,
        iparam: &mut [i32],
        ipntr: &mut [i32],
        workd: &mut [T],
        workl: &mut [T],
        lworkl: i32,
        info: &mut i32,
    ) -> Result<()> {
        self.seupd_at(
            rvec,
            howmny,
            Some(select),
            0,
            Some(d),
            0,
            Some(z),
            0,
            ldz,
            sigma,
            bmat,
            n,
            which,
            nev,
            tol,
            Some(resid),
            0,
            ncv,
            Some(v),
            0,
            ldv,
            Some(iparam),
            0,
            Some(ipntr),
            0,
            Some(workd),
            0,
            Some(workl),
            0,
            lworkl,
            info,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn seupd_at<T: ArpackElement>(
        &self,
        rvec: bool,
        howmny: &str,
        select: Option<&mut [bool]>,
        offselect: usize,
        d: Option<&mut [T]>,
        offd: usize,
        z: Option<&mut [T]>,
        offz: usize,
        ldz: i32,
        sigma: T,
        bmat: &str,
        n: i32,
        which: &str,
        nev: i32,
        tol: T,
        resid: Option<&mut [T]>,
        offresid: usize,
        ncv: i32,
        v: Option<&mut [T]>,
        offv: usize,
        ldv: i32,
        iparam: Option<&mut [i32]>,
        offiparam: usize,
        ipntr: Option<&mut [i32]>,
        offipntr: usize,
        workd: Option<&mut [T]>,
        offworkd: usize,
        workl: Option<&mut [T]>,
        offworkl: usize,
        lworkl: i32,
        info: &mut i32,
    ) -> Result<()> {
        let contract = Contract::new(T::routine("SEUPD"));
        let howmny = contract.flag(2, Howmny::parse(howmny))?;
        // `n` itself is checked at its own, later position
        let ldz = contract.leading(6, ldz, n.max(1) as usize)?;
        let problem = Problem::check(&contract, &SEUPD, bmat, n, which, nev, ncv, ldv, lworkl)?;

        let touched = problem.n > 0;
        let select = require_mut_if(touched, "select", select)?;
        let d = require_mut_if(touched, "d", d)?;
        let z = require_mut_if(touched && rvec, "z", z)?;
        let resid = require_mut_if(touched, "resid", resid)?;
        let v = require_mut_if(touched, "v", v)?;
        let iparam = require_mut_if(touched, "iparam", iparam)?;
        let ipntr = require_mut_if(touched, "ipntr", ipntr)?;
        let workd = require_mut_if(touched, "workd", workd)?;
        let workl = require_mut_if(touched, "workl", workl)?;
        if !touched {
            *info = status::NORMAL;
            return Ok(());
        }

        let work = problem.bind(
            resid, offresid, v, offv, iparam, offiparam, ipntr, offipntr, workd, offworkd, workl, offworkl,
        )?;
        let select = span(select, offselect, problem.ncv)?;
        let d = span(d, offd, problem.nev)?;
        let z_cols = if rvec { problem.nev } else { 0 };
        let z = MatrixViewMut::new(z, offz, problem.n, z_cols, ldz)?;
        self.kernels::<T>().seupd(rvec, howmny, select, d, z, sigma, tol, work, info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workl_len_matches_arpack_minimum() {
        assert_eq!(workl_len(0), 0);
        assert_eq!(workl_len(5), 65);
    }

    #[test]
    fn empty_span_ignores_offset() {
        let mut buffer = [1.0_f64; 2];
        assert!(span(&mut buffer, 10, 0).unwrap().is_empty());
        assert!(span(&mut buffer, 1, 2).is_err());
        assert_eq!(span(&mut buffer, 1, 1).unwrap(), &mut [1.0]);
    }
}
