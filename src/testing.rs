//! Fixtures shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rand::RngCore;
use rand_distr::{Distribution, Poisson};
use statrs::function::gamma::ln_gamma;

use crate::data::{DataList, Dataset};
use crate::error::BoxError;
use crate::model::{FitResult, FittedModel, Fitter, Minimizer};
use crate::table::{NegLogLikelihood, ParameterValues};

/// Dataset without content that counts how often it (or any of its
/// replicas) was simulated.
#[derive(Debug, Clone)]
pub struct Stub {
    name: String,
    fail: bool,
    simulations: Arc<AtomicUsize>,
}

impl Stub {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_owned(), fail: false, simulations: Arc::default() }
    }

    pub fn failing(name: &str) -> Self {
        Self { fail: true, ..Self::new(name) }
    }

    pub fn simulations(&self) -> usize {
        self.simulations.load(Ordering::SeqCst)
    }
}

impl Dataset for Stub {
    fn name(&self) -> &str {
        &self.name
    }

    fn simulated(&self, name: &str, _rng: &mut dyn RngCore) -> Result<Self, BoxError> {
        if self.fail {
            return Err("no simulation support".into());
        }
        self.simulations.fetch_add(1, Ordering::SeqCst);
        Ok(Self {
            name: name.to_owned(),
            fail: false,
            simulations: Arc::clone(&self.simulations),
        })
    }
}

/// Single-parameter model.
#[derive(Debug, Clone, PartialEq)]
pub struct Norm {
    pub mu: f64,
}

#[derive(Debug, Default)]
struct Script {
    /// `None` makes the call fail; `Some((total, per_dataset))` otherwise
    rows: Vec<Option<(f64, Vec<f64>)>>,
    calls: AtomicUsize,
    starts: Mutex<Vec<f64>>,
    minimizers: Mutex<Vec<Minimizer>>,
}

/// Fitter replaying a fixed list of outcomes, one per call.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFitter {
    script: Arc<Script>,
}

impl ScriptedFitter {
    pub fn new(rows: Vec<Option<(f64, Vec<f64>)>>) -> Self {
        Self {
            script: Arc::new(Script { rows, ..Script::default() }),
        }
    }

    /// Every call returns `total` and `per_dataset`.
    pub fn constant(n: usize, total: f64, per_dataset: &[f64]) -> Self {
        Self::new(vec![Some((total, per_dataset.to_vec())); n])
    }

    pub fn calls(&self) -> usize {
        self.script.calls.load(Ordering::SeqCst)
    }

    /// Parameter value of every model handed to `fit`, in call order.
    pub fn starts(&self) -> Vec<f64> {
        self.script.starts.lock().unwrap().clone()
    }

    /// Minimizer handed to every call, in call order.
    pub fn minimizers(&self) -> Vec<Minimizer> {
        self.script.minimizers.lock().unwrap().clone()
    }
}

impl Fitter<Norm, Stub> for ScriptedFitter {
    fn fit(&self, mut model: Norm, data: &DataList<Stub>, minimizer: &Minimizer) -> Result<FitResult, BoxError> {
        let call = self.script.calls.fetch_add(1, Ordering::SeqCst);
        self.script.starts.lock().unwrap().push(model.mu);
        self.script.minimizers.lock().unwrap().push(minimizer.clone());

        let (total, per_dataset) = self
            .script
            .rows
            .get(call)
            .cloned()
            .flatten()
            .ok_or_else(|| format!("fit {call} did not converge"))?;

        // the fitter owns its copy and is free to move it
        model.mu += 1.0;

        let likelihood = data
            .names()
            .zip(per_dataset)
            .fold(NegLogLikelihood::new(total), |nll, (name, v)| nll.with_dataset(name, v));

        Ok(FitResult {
            parameters: ParameterValues(vec![("mu".to_owned(), model.mu)]),
            likelihood,
        })
    }
}

/// Handle over [`Stub`] datasets replaying a [`ScriptedFitter`].
pub struct StubFit {
    pub model: Norm,
    pub data: DataList<Stub>,
    pub fitter: ScriptedFitter,
}

impl StubFit {
    pub fn new(names: &[&str], fitter: ScriptedFitter) -> Self {
        Self {
            model: Norm { mu: 1.25 },
            data: DataList::from_datasets(names.iter().map(|n| Stub::new(n))).unwrap(),
            fitter,
        }
    }
}

impl FittedModel for StubFit {
    type Model = Norm;
    type Data = Stub;
    type Fitter = ScriptedFitter;

    fn best_fit(&self) -> Norm {
        self.model.clone()
    }

    fn minimizer_in_use(&self) -> Minimizer {
        Minimizer::new("scripted").algorithm("replay")
    }

    fn data_list(&self) -> &DataList<Stub> {
        &self.data
    }

    fn fitter(&self) -> ScriptedFitter {
        self.fitter.clone()
    }
}

/// Binned counts with a shape template; the prediction is `mu * template`.
#[derive(Debug, Clone)]
pub struct Counts {
    name: String,
    pub observed: Vec<f64>,
    pub template: Vec<f64>,
    /// Normalization currently loaded for simulation
    pub mu: f64,
}

impl Counts {
    pub fn new(name: &str, observed: Vec<f64>, template: Vec<f64>) -> Self {
        Self { name: name.to_owned(), observed, template, mu: 1.0 }
    }

    fn nll(&self, mu: f64) -> f64 {
        self.observed
            .iter()
            .zip(&self.template)
            .map(|(&n, &t)| {
                let lam = mu * t;
                if n == 0.0 { lam } else { lam - n * lam.ln() + ln_gamma(n + 1.0) }
            })
            .sum()
    }
}

impl Dataset for Counts {
    fn name(&self) -> &str {
        &self.name
    }

    fn simulated(&self, name: &str, rng: &mut dyn RngCore) -> Result<Self, BoxError> {
        let mut observed = Vec::with_capacity(self.template.len());
        for &t in &self.template {
            observed.push(Poisson::new(self.mu * t)?.sample(&mut *rng));
        }
        Ok(Self { name: name.to_owned(), observed, ..self.clone() })
    }
}

/// Closed-form maximum likelihood fit of a shared normalization.
#[derive(Debug, Clone, Copy)]
pub struct PoissonFitter;

impl PoissonFitter {
    pub fn solve(data: &DataList<Counts>) -> Result<FitResult, BoxError> {
        let (n, t) = data.values().fold((0.0, 0.0), |(n, t), d| {
            (n + d.observed.iter().sum::<f64>(), t + d.template.iter().sum::<f64>())
        });
        if t <= 0.0 {
            return Err("empty template".into());
        }
        let mu = n / t;

        let mut likelihood = NegLogLikelihood::new(0.0);
        for d in data {
            let value = d.nll(mu);
            likelihood.total += value;
            likelihood = likelihood.with_dataset(d.name(), value);
        }
        Ok(FitResult {
            parameters: ParameterValues(vec![("mu".to_owned(), mu)]),
            likelihood,
        })
    }
}

impl Fitter<Norm, Counts> for PoissonFitter {
    fn fit(&self, _start: Norm, data: &DataList<Counts>, _: &Minimizer) -> Result<FitResult, BoxError> {
        Self::solve(data)
    }
}

/// A completed Poisson fit.
pub struct CountsFit {
    pub model: Norm,
    pub data: DataList<Counts>,
    pub reference: NegLogLikelihood,
}

impl CountsFit {
    /// Fit `data` and load the best-fit normalization into every dataset.
    pub fn fit(data: DataList<Counts>) -> Self {
        let fit = PoissonFitter::solve(&data).unwrap();
        let mu = fit.parameters.get("mu").unwrap();
        let data = DataList::from_datasets(data.into_iter().map(|d| Counts { mu, ..d })).unwrap();
        Self { model: Norm { mu }, data, reference: fit.likelihood }
    }
}

impl FittedModel for CountsFit {
    type Model = Norm;
    type Data = Counts;
    type Fitter = PoissonFitter;

    fn best_fit(&self) -> Norm {
        self.model.clone()
    }

    fn minimizer_in_use(&self) -> Minimizer {
        Minimizer::new("closed-form")
    }

    fn data_list(&self) -> &DataList<Counts> {
        &self.data
    }

    fn fitter(&self) -> PoissonFitter {
        PoissonFitter
    }
}
