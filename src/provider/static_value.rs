use super::Override;
use crate::core::DiResult;
use crate::di::{Produce, Provider};
use std::fmt;

/// Provider that returns a fixed value.
pub struct Static<T> {
    base: Override<T>,
    value: T,
}

impl<T> Static<T> {
    pub fn new(value: T) -> Self {
        Self {
            base: Override::new(),
            value,
        }
    }

    /// The constructed value, ignoring any override.
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Clone> Produce<T> for Static<T> {
    fn produce(&self) -> DiResult<T> {
        Ok(self.value.clone())
    }
}

impl<T> Provider<T> for Static<T>
where
    T: Clone + Send + Sync,
{
    fn get(&self) -> DiResult<T> {
        self.base.resolve(|| self.produce())
    }

    fn set(&self, value: T) -> DiResult<()> {
        self.base.set(value);
        Ok(())
    }

    fn reset(&self) -> DiResult<()> {
        self.base.reset();
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for Static<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Static")
            .field("value", &self.value)
            .field("override", &self.base)
            .finish()
    }
}
