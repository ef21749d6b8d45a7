/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The backend could not be reached at all.
    Connect,
    /// The backend answered with a non-success status.
    Status,
    /// The connection dropped while the body was being received.
    Interrupted,
    /// The received bytes are not valid text.
    Decode,
    /// Any other errors.
    Other,
}
