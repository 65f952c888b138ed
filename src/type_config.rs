use std::fmt::Debug;

use crate::Delivery;
use crate::SearchSource;
use crate::TrackStore;

/// Binds the collaborator implementations a tracker runs against.
pub trait TypeConfig:
    Sync + Send + Sized + Debug + Clone + Copy + Default + Eq + PartialEq + Ord + PartialOrd + 'static
{
    type S: SearchSource;

    type P: TrackStore;

    type D: Delivery;
}

pub mod alias {
    use super::TypeConfig;

    pub type SOF<T> = <T as TypeConfig>::S;

    pub type POF<T> = <T as TypeConfig>::P;

    pub type DOF<T> = <T as TypeConfig>::D;
}
