//! Exhaustive search for still lifes of a given size

pub mod enumerator;
pub mod interior;
pub mod result;
pub mod validator;

pub use enumerator::{
    CancelToken, SearchStatistics, SearchStep, StillLifeEnumerator, StillLifeSearch,
};
pub use interior::{Interior, Symmetry};
pub use result::StillLife;
pub use validator::{StillLifeValidator, ValidationResult};
