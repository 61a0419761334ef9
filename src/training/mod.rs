//! Private training infrastructure.
//!
//! ## Objectives
//!
//! - [`LogisticObjective`]: L2-regularized mean logistic loss
//! - [`PerturbedObjective`]: adds the objective-perturbation noise term
//!
//! ## Optimization
//!
//! - [`Lbfgs`]: quasi-Newton minimizer with backtracking line search
//! - [`Convergence`], [`Termination`]: how a minimization ended
//!
//! ## Trainer
//!
//! - [`ObjectivePerturbation`]: calibration, noise and optimization for an
//!   ε-differentially-private fit
//! - [`TrainingLogger`], [`Verbosity`]: structured logging

mod lbfgs;
mod logger;
mod objective;
mod perturbation;

pub use lbfgs::{Convergence, Lbfgs, LbfgsParams, OptimizeResult, Termination};
pub use logger::{TrainingLogger, Verbosity};
pub use objective::{
    design_matrix, sigmoid, DifferentiableObjective, LogisticObjective, PerturbedObjective,
};
pub use perturbation::{ObjectivePerturbation, PerturbationParams, PerturbedFit};
