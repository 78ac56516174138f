use std::time::Duration;

/// Move Service endpoint for both single-shot and streamed moves.
pub const MOVE_ENDPOINT: &str = "/api/move";

/// Move Service endpoint returning the number of files below a directory.
pub const COUNT_FILES_ENDPOINT: &str = "/api/count-files";

/// Move Service endpoint returning the byte size of a directory.
pub const FOLDER_SIZE_ENDPOINT: &str = "/api/folder-size";

/// Upper bound for a whole batch, from start of estimation to the last item.
pub const BATCH_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Upper bound for a single streamed transfer.
///
/// When it elapses without `done` or `error` the item is reported as
/// succeeded, mirroring the "stream closed implies success" rule.
pub const STREAM_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Timeout for single-shot JSON requests (move, count, size).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Frame tag for per-item progress (`progress:<0..100>`).
pub const FRAME_PROGRESS: &str = "progress:";

/// Frame tag for liveness messages (`keepalive:<text>`).
pub const FRAME_KEEPALIVE: &str = "keepalive:";

/// Frame tag for a failed transfer (`error:<message>`).
pub const FRAME_ERROR: &str = "error:";

/// The only normal terminal frame.
pub const FRAME_DONE: &str = "done";

/// Longest progress frame accepted before a newline must appear.
pub const MAX_FRAME_LEN: usize = 64 * 1024;
