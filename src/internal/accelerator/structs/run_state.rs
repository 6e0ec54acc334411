/// 单次下载的状态机：`Probing → {Fresh, Resuming} → Fetching → {Completed, Failed}`。
///
/// 不支持分片时走 `Probing → SingleStream → {Completed, Failed}`。
/// 没有自动重试：`Failed` 之后由调用方再次调用 `download()` 续传。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Probing,
    Fresh,
    Resuming,
    SingleStream,
    Fetching,
    Completed,
    Failed,
}
