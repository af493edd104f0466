//! Helpers shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use netlib_arpack::backends::ReferenceArpack;
use netlib_arpack::codes::ido;
use netlib_arpack::{workl_len, Arpack, PARAM_LEN};

/// Relative-epsilon comparison with an absolute floor for values near zero
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance * scale,
        "expected {expected}, got {actual} (tolerance {tolerance})"
    );
}

pub fn assert_all_close(actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (k, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        let scale = e.abs().max(1.0);
        assert!(
            (a - e).abs() <= tolerance * scale,
            "element {k}: expected {e}, got {a} (tolerance {tolerance})"
        );
    }
}

pub fn reference() -> Arpack {
    Arpack::new(Arc::new(ReferenceArpack::new()))
}

/// `y := diag(values)·x`
pub fn diagonal(values: &[f64]) -> impl Fn(&[f64], &mut [f64]) + '_ {
    move |x: &[f64], y: &mut [f64]| {
        for ((y, x), a) in y.iter_mut().zip(x).zip(values) {
            *y = a * x;
        }
    }
}

/// `y := T·x` for the symmetric tridiagonal `T` with diagonal `a` and
/// off-diagonal `b`
pub fn tridiagonal(a: f64, b: f64) -> impl Fn(&[f64], &mut [f64]) {
    move |x: &[f64], y: &mut [f64]| {
        let n = x.len();
        for i in 0..n {
            let mut sum = a * x[i];
            if i > 0 {
                sum += b * x[i - 1];
            }
            if i + 1 < n {
                sum += b * x[i + 1];
            }
            y[i] = sum;
        }
    }
}

/// Caller-side state of one symmetric eigenproblem in `f64`
#[derive(Debug)]
pub struct Lanczos {
    pub n: usize,
    pub nev: usize,
    pub ncv: usize,
    pub which: &'static str,
    pub tol: f64,
    pub resid: Vec<f64>,
    pub v: Vec<f64>,
    pub iparam: [i32; PARAM_LEN],
    pub ipntr: [i32; PARAM_LEN],
    pub workd: Vec<f64>,
    pub workl: Vec<f64>,
    pub info: i32,
    /// Operator applications requested by `saupd`
    pub products: usize,
}

impl Lanczos {
    /// Regular mode with exact shifts
    pub fn new(n: usize, nev: usize, ncv: usize, which: &'static str) -> Self {
        let mut iparam = [0; PARAM_LEN];
        iparam[0] = 1;
        iparam[2] = 500;
        iparam[6] = 1;
        Self {
            n,
            nev,
            ncv,
            which,
            tol: 1e-10,
            resid: vec![0.0; n],
            v: vec![0.0; n * ncv],
            iparam,
            ipntr: [0; PARAM_LEN],
            workd: vec![0.0; 3 * n],
            workl: vec![0.0; workl_len(ncv)],
            info: 0,
            products: 0,
        }
    }

    pub fn mode(mut self, mode: i32) -> Self {
        self.iparam[6] = mode;
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// One `saupd` call
    pub fn step(&mut self, arpack: &Arpack, request: &mut i32) -> netlib_core::Result<()> {
        let lworkl = self.workl.len() as i32;
        arpack.saupd(
            request,
            "I",
            self.n as i32,
            self.which,
            self.nev as i32,
            &mut self.tol,
            &mut self.resid,
            self.ncv as i32,
            &mut self.v,
            self.n as i32,
            &mut self.iparam,
            &mut self.ipntr,
            &mut self.workd,
            &mut self.workl,
            lworkl,
            &mut self.info,
        )
    }

    /// Drive `saupd` to completion, applying `op` on every product request.
    ///
    /// Returns the final `info`.
    pub fn run(&mut self, arpack: &Arpack, op: impl Fn(&[f64], &mut [f64])) -> netlib_core::Result<i32> {
        let mut request = ido::START;
        loop {
            self.step(arpack, &mut request)?;
            match request {
                ido::DONE => return Ok(self.info),
                ido::FIRST_PRODUCT | ido::PRODUCT => self.apply(&op),
                other => panic!("unexpected request {other}"),
            }
        }
    }

    /// `Y := OP·X` at the positions `ipntr` names
    pub fn apply(&mut self, op: &impl Fn(&[f64], &mut [f64])) {
        let n = self.n;
        let (x, y) = (self.ipntr[0] as usize - 1, self.ipntr[1] as usize - 1);
        let input = self.workd[x..x + n].to_vec();
        op(&input, &mut self.workd[y..y + n]);
        self.products += 1;
    }

    /// `seupd` after a run: the Ritz values, the Ritz vectors (`n x nev`,
    /// empty without `rvec`) and `info`
    pub fn extract(
        &mut self,
        arpack: &Arpack,
        rvec: bool,
        sigma: f64,
    ) -> netlib_core::Result<(Vec<f64>, Vec<f64>, i32)> {
        let mut select = vec![false; self.ncv];
        let mut d = vec![0.0; self.nev];
        let mut z = vec![0.0; self.n * self.nev];
        let mut info = 0;
        let lworkl = self.workl.len() as i32;
        arpack.seupd(
            rvec,
            "A",
            &mut select,
            &mut d,
            &mut z,
            self.n as i32,
            sigma,
            "I",
            self.n as i32,
            self.which,
            self.nev as i32,
            self.tol,
            &mut self.resid,
            self.ncv as i32,
            &mut self.v,
            self.n as i32,
            &mut self.iparam,
            &mut self.ipntr,
            &mut self.workd,
            &mut self.workl,
            lworkl,
            &mut info,
        )?;
        if !rvec {
            z.clear();
        }
        Ok((d, z, info))
    }

    pub fn iterations(&self) -> i32 {
        self.iparam[2]
    }

    pub fn converged(&self) -> i32 {
        self.iparam[4]
    }
}

/// Largest entry of `|op·z - lambda·z|` over the columns of `z`
pub fn residual(op: &impl Fn(&[f64], &mut [f64]), lambda: &[f64], z: &[f64], n: usize) -> f64 {
    let mut worst = 0.0_f64;
    let mut image = vec![0.0; n];
    for (j, &value) in lambda.iter().enumerate() {
        let column = &z[j * n..(j + 1) * n];
        op(column, &mut image);
        for (y, x) in image.iter().zip(column) {
            worst = worst.max((y - value * x).abs());
        }
    }
    worst
}

pub fn norm(x: &[f64]) -> f64 {
    x.iter().map(|value| value * value).sum::<f64>().sqrt()
}
