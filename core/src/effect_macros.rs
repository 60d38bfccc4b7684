//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```
/// use loket_core::async_effect;
///
/// let effect = async_effect! {
///     Some(42_u32)
/// };
/// # let _ = effect;
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Cancellable` registered under a string id
///
/// # Example
///
/// ```
/// use loket_core::{async_effect, cancellable};
///
/// let effect = cancellable! {
///     id: "checkout",
///     effect: async_effect! { Some(1_u8) }
/// };
/// # let _ = effect;
/// ```
#[macro_export]
macro_rules! cancellable {
    (
        id: $id:expr,
        effect: $effect:expr
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $crate::effect::EffectId::new($id),
            effect: ::std::boxed::Box::new($effect),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        PaymentSettled { amount: u64 },
        HoldExpired,
    }

    #[test]
    fn async_effect_runs_body() {
        let effect = async_effect! {
            Some(TestAction::PaymentSettled { amount: 1_050_000 })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! builds Effect::Future");
        };
        assert_eq!(
            tokio_test::block_on(fut),
            Some(TestAction::PaymentSettled { amount: 1_050_000 })
        );
    }

    #[test]
    fn cancellable_macro() {
        let effect = cancellable! {
            id: "checkout",
            effect: async_effect! { Some(TestAction::HoldExpired) }
        };

        let Effect::Cancellable { id, effect } = effect else {
            unreachable!("cancellable! builds Effect::Cancellable");
        };
        assert_eq!(id.as_str(), "checkout");
        let Effect::Future(fut) = *effect else {
            unreachable!("inner effect is the async block");
        };
        assert_eq!(tokio_test::block_on(fut), Some(TestAction::HoldExpired));
    }
}
