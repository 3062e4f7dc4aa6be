use std::borrow::Cow;

use crate::protocol::{Entity, Headers};

/// Behaviour shared by requests and responses.
pub trait HttpMessage {
    fn headers(&self) -> &Headers;

    fn entity(&self) -> Option<&Entity>;

    /// Case-insensitive header lookup, multiple values joined with `", "`.
    fn header_value<N: AsRef<str>>(&self, name: N) -> Option<Cow<'_, str>>
    where
        Self: Sized,
    {
        self.headers().get(name)
    }
}
