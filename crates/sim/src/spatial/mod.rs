//! Spatial classification over the mass-ordered population.

mod classifier;

pub use classifier::{ABSORB_RATIO, AWARENESS, Classifier, PREDATOR_MARGIN};
