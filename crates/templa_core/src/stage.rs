//! Builder stages and the typed targets that prove a stage was reached.
//!
//! A builder moves through three stages:
//!
//! 1. **Initialized**: the target returned by `init_builder_target`.
//! 2. **Processed**: the template was rendered and parsed.
//! 3. **Built**: the processed value was turned into the final artifact.
//!
//! Each stage is a marker type, and a [`BuilderTarget`] is tagged with the
//! stage it proves. Stage methods only accept targets of the right stage, so
//! calling them out of order does not compile. Targets also carry the
//! [`BuilderId`] of the builder that issued them, which every builder method
//! checks before touching its state.

use std::fmt;
use std::marker::PhantomData;

use uuid::Uuid;

/// Identity of a builder instance.
///
/// Every builder gets a fresh id on construction, so builders created from
/// equal inputs are still told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuilderId(Uuid);

impl BuilderId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BuilderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Initialized {}
    impl Sealed for super::Processed {}
    impl Sealed for super::Built {}
}

/// A builder stage.
pub trait Stage: sealed::Sealed {
    const NAME: &'static str;
}

/// Stages at which the processed value is available.
pub trait ProcessedStage: Stage {}

/// The builder was created and nothing has run yet.
#[derive(Debug)]
pub enum Initialized {}

/// The template was rendered and parsed.
#[derive(Debug)]
pub enum Processed {}

/// The processed value was built into the final artifact.
#[derive(Debug)]
pub enum Built {}

impl Stage for Initialized {
    const NAME: &'static str = "initialized";
}

impl Stage for Processed {
    const NAME: &'static str = "processed";
}

impl Stage for Built {
    const NAME: &'static str = "built";
}

impl ProcessedStage for Processed {}
impl ProcessedStage for Built {}

/// Proof that a builder reached stage `S`.
///
/// Only builders create targets. Stage-advancing methods consume the target
/// of the previous stage and hand back the next one; fetch methods borrow it.
pub struct BuilderTarget<S: Stage> {
    builder_id: BuilderId,
    _stage: PhantomData<fn() -> S>,
}

impl<S: Stage> BuilderTarget<S> {
    pub(crate) fn new(builder_id: BuilderId) -> Self {
        Self {
            builder_id,
            _stage: PhantomData,
        }
    }

    pub(crate) fn advance<T: Stage>(self) -> BuilderTarget<T> {
        BuilderTarget::new(self.builder_id)
    }

    /// The builder that issued this target.
    pub fn builder_id(&self) -> BuilderId {
        self.builder_id
    }

    pub fn stage(&self) -> &'static str {
        S::NAME
    }
}

impl<S: Stage> fmt::Debug for BuilderTarget<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderTarget")
            .field("builder_id", &self.builder_id)
            .field("stage", &S::NAME)
            .finish()
    }
}

pub type BuilderTargetInitialized = BuilderTarget<Initialized>;
pub type BuilderTargetProcessed = BuilderTarget<Processed>;
pub type BuilderTargetBuilt = BuilderTarget<Built>;
