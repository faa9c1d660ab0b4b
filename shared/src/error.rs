use thiserror::Error;

/// Errors that can propagate out of a scheduling run.
///
/// Per the propagation policy, legality probes and the fitness evaluator
/// never fail — they report problems as violation strings instead. Only
/// an unsatisfiable precondition or an I/O fault from one of the external
/// stores reaches this type.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("precondition failed: {0}")]
    PreconditionFailure(String),

    #[error("storage failure: {0}")]
    StorageFailure(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
