pub mod combined;
pub mod result;
pub mod safe_call;
pub mod use_case;

#[cfg(feature = "runtime")]
pub mod parallel;
#[cfg(feature = "runtime")]
pub mod runtime;

pub use combined::combined_call;
#[cfg(feature = "runtime")]
pub use parallel::execute_parallelly;
pub use result::{ErrorResult, Outcome, OutcomeKind};
#[cfg(feature = "runtime")]
pub use runtime::Dispatcher;
pub use safe_call::safe_call;
pub use use_case::{UseCase, UseCaseDyn, UseCaseNoParams, UseCaseResultNoParams};
