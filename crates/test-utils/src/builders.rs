use tododag::config::{BoardFile, RawBoardFile, TaskConfig};
use tododag::types::TaskId;

/// Builder for `BoardFile` to simplify test setup.
pub struct BoardFileBuilder {
    board: RawBoardFile,
}

impl BoardFileBuilder {
    pub fn new() -> Self {
        Self {
            board: RawBoardFile::default(),
        }
    }

    pub fn with_task(mut self, id: TaskId, task: TaskConfig) -> Self {
        self.board.task.insert(id.to_string(), task);
        self
    }

    pub fn with_request_queue_length(mut self, len: usize) -> Self {
        self.board.config.request_queue_length = len;
        self
    }

    /// The unvalidated form, for tests that expect validation to fail.
    pub fn build_raw(self) -> RawBoardFile {
        self.board
    }

    pub fn build(self) -> BoardFile {
        BoardFile::try_from(self.board).expect("Failed to build valid board from builder")
    }

    /// Serialise the raw board to TOML text, as it would sit on disk.
    pub fn to_toml(&self) -> String {
        toml::to_string(&self.board).expect("board serialises to TOML")
    }
}

impl Default for BoardFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            task: TaskConfig::new(title),
        }
    }

    pub fn after(mut self, dep: TaskId) -> Self {
        self.task.after.push(dep);
        self
    }

    pub fn due_date(mut self, date: &str) -> Self {
        self.task.due_date = Some(date.to_string());
        self
    }

    pub fn image_url(mut self, url: &str) -> Self {
        self.task.image_url = Some(url.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
