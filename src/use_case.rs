//! Execution units of application logic.
//!
//! A use case is invoked with typed params and produces a typed output. The two
//! parameterless flavours are ergonomic layers: implementing [`UseCaseNoParams`] also
//! gives a [`UseCase`] with `Params = ()`, and implementing [`UseCaseResultNoParams`]
//! gives both of the others.
//!
//! A type reaching several of these traits exposes several `invoke` methods. When more
//! than one trait is in scope, call through the trait: `UseCase::invoke(&uc, ())`.

use crate::result::Outcome;

/// Use cases and their futures are `Send` so they can be spawned onto a multi-threaded
/// runtime and boxed as [`UseCaseDyn`].
pub trait UseCase: Send + Sync + 'static {
    type Params;
    type Output;

    fn invoke(&self, params: Self::Params) -> impl Future<Output = Self::Output> + Send;

    fn boxed(self) -> Box<dyn UseCaseDyn<Self::Params, Self::Output>>
    where
        Self: Sized,
        Self::Params: Send + 'static,
        Self::Output: 'static,
    {
        Box::new(self)
    }
}

pub trait UseCaseNoParams: Send + Sync + 'static {
    type Output;

    fn invoke(&self) -> impl Future<Output = Self::Output> + Send;
}

/// A parameterless use case reporting through [`Outcome`].
pub trait UseCaseResultNoParams: Send + Sync + 'static {
    type Data;

    fn invoke(&self) -> impl Future<Output = Outcome<Self::Data>> + Send;
}

impl<U> UseCase for U
where
    U: UseCaseNoParams,
{
    type Params = ();
    type Output = U::Output;

    fn invoke(&self, _params: ()) -> impl Future<Output = Self::Output> + Send {
        UseCaseNoParams::invoke(self)
    }
}

impl<U> UseCaseNoParams for U
where
    U: UseCaseResultNoParams,
{
    type Output = Outcome<U::Data>;

    fn invoke(&self) -> impl Future<Output = Self::Output> + Send {
        UseCaseResultNoParams::invoke(self)
    }
}

/// Object-safe form of [`UseCase`], for storing heterogeneous use cases behind a `Box`.
#[async_trait::async_trait]
pub trait UseCaseDyn<P, T>: Send + Sync + 'static {
    async fn invoke(&self, params: P) -> T;
}

#[async_trait::async_trait]
impl<U, P, T> UseCaseDyn<P, T> for U
where
    U: UseCase<Params = P, Output = T>,
    P: Send + 'static,
    T: 'static,
{
    async fn invoke(&self, params: P) -> T {
        UseCase::invoke(self, params).await
    }
}
