use crate::MockDelivery;
use crate::MockSearchSource;
use crate::MockTrackStore;
use crate::TypeConfig;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct MockTypeConfig;

impl TypeConfig for MockTypeConfig {
    type S = MockSearchSource;

    type P = MockTrackStore;

    type D = MockDelivery;
}
