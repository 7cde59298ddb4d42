use anyhow::{Context, Result};
use std::marker::PhantomData;

/// A stateless operation converting an input of type `I` to an output of
/// type `O`.
///
/// Stages are pure: all randomness lives in the parameters passed to them at
/// construction time, never in ambient state, so applying the same stage to
/// two images yields spatially consistent results. Stages compose with
/// [`then`](Transform::then) into a single statically dispatched pipeline.
pub trait Transform<I, O>: Send + Sync {
    /// Applies the transformation to the input.
    fn apply(&self, input: I) -> Result<O>;

    #[inline]
    fn then<T, M>(self, next: T) -> Chain<Self, T, O>
    where
        Self: Sized,
        T: Transform<O, M>,
        O: Send,
        M: Send,
    {
        Chain {
            first: self,
            second: next,
            _marker: PhantomData,
        }
    }
}

/// Two transforms applied in sequence.
///
/// `PhantomData<M>` pins the intermediate type so the compiler can check the
/// seam between the two stages.
#[derive(Debug)]
pub struct Chain<A, B, M> {
    first: A,
    second: B,
    _marker: PhantomData<fn() -> M>,
}

impl<A, B, M> Chain<A, B, M> {
    /// Use [`Transform::then`] for ergonomics; `Chain::new` exists for
    /// building pipelines where the stages are chosen at runtime.
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            _marker: PhantomData,
        }
    }
}

impl<I, M, O, A, B> Transform<I, O> for Chain<A, B, M>
where
    A: Transform<I, M>,
    B: Transform<M, O>,
    M: Send,
{
    fn apply(&self, input: I) -> Result<O> {
        self.first
            .apply(input)
            .and_then(|mid| self.second.apply(mid))
            .with_context(|| {
                format!(
                    "transform chain failed: {} → {}",
                    std::any::type_name::<A>(),
                    std::any::type_name::<B>(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct Double;
    impl Transform<i64, i64> for Double {
        fn apply(&self, input: i64) -> Result<i64> {
            Ok(input * 2)
        }
    }

    struct Stringify;
    impl Transform<i64, String> for Stringify {
        fn apply(&self, input: i64) -> Result<String> {
            Ok(input.to_string())
        }
    }

    #[test]
    fn test_then_composes_in_order() -> Result<()> {
        let pipeline = Double.then(Stringify);
        assert_eq!(pipeline.apply(21)?, "42");
        Ok(())
    }

    #[test]
    fn test_chain_error_carries_stage_names() {
        struct Fail;
        impl Transform<i64, i64> for Fail {
            fn apply(&self, _: i64) -> Result<i64> {
                Err(anyhow!("boom"))
            }
        }

        let err = Chain::new(Double, Fail).apply(1).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("transform chain failed"));
        assert!(msg.contains("Fail"));
    }
}
