//! Request and response types for the LangGraph API.
//!
//! These types mirror the server's API contract. Timestamps are kept as the
//! ISO 8601 strings the server sends.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Free-form JSON object.
pub type Json = serde_json::Map<String, serde_json::Value>;

// ─────────────────────────────────────────────────────────────────────────────
// Enumerations
// ─────────────────────────────────────────────────────────────────────────────

/// Status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Waiting to start.
    Pending,
    /// Currently executing.
    Running,
    /// Stopped with an error.
    Error,
    /// Completed successfully.
    Success,
    /// Exceeded its time limit.
    Timeout,
    /// Manually stopped or interrupted.
    Interrupted,
}

impl RunStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Error => "error",
            RunStatus::Success => "success",
            RunStatus::Timeout => "timeout",
            RunStatus::Interrupted => "interrupted",
        }
    }
}

/// Status of a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadStatus {
    /// Not processing anything.
    Idle,
    /// Actively processing.
    Busy,
    /// Execution was interrupted.
    Interrupted,
    /// Processing raised an error.
    Error,
}

/// What a run streams back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamMode {
    /// Full state after each step.
    Values,
    /// Complete messages.
    Messages,
    /// State updates per node.
    Updates,
    /// Execution events.
    Events,
    /// Debug information.
    Debug,
    /// Custom events emitted by the graph.
    Custom,
    /// Messages as (chunk, metadata) tuples.
    MessagesTuple,
}

impl std::str::FromStr for StreamMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "values" => Ok(StreamMode::Values),
            "messages" => Ok(StreamMode::Messages),
            "updates" => Ok(StreamMode::Updates),
            "events" => Ok(StreamMode::Events),
            "debug" => Ok(StreamMode::Debug),
            "custom" => Ok(StreamMode::Custom),
            "messages-tuple" => Ok(StreamMode::MessagesTuple),
            other => Err(format!("unknown stream mode '{other}'")),
        }
    }
}

/// What the server does with a run when the client disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisconnectMode {
    /// Cancel the run.
    Cancel,
    /// Keep running.
    Continue,
}

/// How to handle a new run on a busy thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultitaskStrategy {
    /// Reject the new run.
    Reject,
    /// Interrupt the current run.
    Interrupt,
    /// Roll back the current run and start the new one.
    Rollback,
    /// Queue the new run.
    Enqueue,
}

/// What to do when creating something that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnConflictBehavior {
    /// Fail.
    Raise,
    /// Return the existing resource.
    DoNothing,
}

/// What to do with the thread of a stateless run once it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnCompletionBehavior {
    /// Delete the thread.
    Delete,
    /// Keep the thread.
    Keep,
}

/// What to do when the target thread does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfNotExists {
    /// Create the thread.
    Create,
    /// Fail.
    Reject,
}

/// How a run is cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelAction {
    /// Stop the run.
    #[default]
    Interrupt,
    /// Stop the run and delete it with its checkpoints.
    Rollback,
}

/// Nodes to interrupt at: every node (`"*"`) or a named list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InterruptNodes {
    /// The `"*"` wildcard.
    All(AllNodes),
    /// Specific node names.
    Nodes(Vec<String>),
}

/// The `"*"` wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllNodes {
    /// Every node.
    #[serde(rename = "*")]
    All,
}

impl InterruptNodes {
    /// Interrupt at every node.
    pub fn all() -> Self {
        InterruptNodes::All(AllNodes::All)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared structures
// ─────────────────────────────────────────────────────────────────────────────

/// Runnable configuration passed to a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Tags for this call and any sub-calls.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Maximum recursion depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recursion_limit: Option<u32>,
    /// Runtime values for configurable attributes.
    #[serde(default, skip_serializing_if = "Json::is_empty")]
    pub configurable: Json,
}

/// A saved point in a thread's history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Owning thread.
    pub thread_id: String,
    /// Checkpoint namespace.
    #[serde(default)]
    pub checkpoint_ns: String,
    /// Checkpoint ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_id: Option<String>,
    /// Checkpoint-specific data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_map: Option<Json>,
}

/// A command to resume or redirect a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Where to go next.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goto: Option<serde_json::Value>,
    /// State updates to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<Json>,
    /// Value to resume an interrupt with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<serde_json::Value>,
}

/// An interrupt raised by a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interrupt {
    /// Interrupt value.
    #[serde(default)]
    pub value: serde_json::Value,
    /// When the interrupt happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
    /// Whether the interrupt can be resumed.
    #[serde(default)]
    pub resumable: bool,
    /// Namespace of the interrupt.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ns: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Assistants
// ─────────────────────────────────────────────────────────────────────────────

/// An assistant: a configured instance of a graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assistant {
    /// Assistant ID.
    pub assistant_id: String,
    /// Graph this assistant runs.
    pub graph_id: String,
    /// Assistant config.
    #[serde(default)]
    pub config: GraphConfig,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Assistant metadata.
    #[serde(default)]
    pub metadata: Json,
    /// Version number.
    #[serde(default)]
    pub version: u32,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Graph structure as nodes and edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph nodes.
    pub nodes: Vec<GraphNode>,
    /// Graph edges.
    pub edges: Vec<GraphEdge>,
}

/// A graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node ID.
    pub id: serde_json::Value,
    /// Node type.
    #[serde(rename = "type", default)]
    pub node_type: String,
    /// Node data.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A graph edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source node.
    pub source: String,
    /// Target node.
    pub target: String,
}

/// Input, output, state and config schemas of a graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSchema {
    /// Graph ID.
    pub graph_id: String,
    /// Input schema.
    #[serde(default)]
    pub input_schema: Option<serde_json::Value>,
    /// Output schema.
    #[serde(default)]
    pub output_schema: Option<serde_json::Value>,
    /// State schema.
    #[serde(default)]
    pub state_schema: Option<serde_json::Value>,
    /// Config schema.
    #[serde(default)]
    pub config_schema: Option<serde_json::Value>,
}

/// Request to create an assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAssistantRequest {
    /// Graph to run.
    pub graph_id: String,
    /// Assistant config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GraphConfig>,
    /// Assistant metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Json>,
    /// Explicit assistant ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    /// Behavior if the ID already exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_exists: Option<OnConflictBehavior>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to update an assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAssistantRequest {
    /// New graph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_id: Option<String>,
    /// New config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GraphConfig>,
    /// Metadata to merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Json>,
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to search assistants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAssistantsRequest {
    /// Metadata filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Json>,
    /// Graph filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_id: Option<String>,
    /// Maximum results.
    pub limit: u32,
    /// Results to skip.
    pub offset: u32,
    /// Sort field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Sort order (`asc` or `desc`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

impl Default for SearchAssistantsRequest {
    fn default() -> Self {
        Self {
            metadata: None,
            graph_id: None,
            limit: 10,
            offset: 0,
            sort_by: None,
            sort_order: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Threads
// ─────────────────────────────────────────────────────────────────────────────

/// A conversation thread holding graph state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Thread ID.
    pub thread_id: String,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
    /// Thread metadata.
    #[serde(default)]
    pub metadata: Json,
    /// Thread status.
    pub status: ThreadStatus,
    /// Current state values.
    #[serde(default)]
    pub values: serde_json::Value,
    /// Interrupts raised in this thread, keyed by task.
    #[serde(default)]
    pub interrupts: HashMap<String, Vec<Interrupt>>,
}

/// A task pending in a thread state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadTask {
    /// Task ID.
    pub id: String,
    /// Task name.
    pub name: String,
    /// Error message, if any.
    #[serde(default)]
    pub error: Option<String>,
    /// Interrupts raised by the task.
    #[serde(default)]
    pub interrupts: Vec<Interrupt>,
    /// Associated checkpoint.
    #[serde(default)]
    pub checkpoint: Option<Checkpoint>,
    /// Subgraph state.
    #[serde(default)]
    pub state: Option<Box<ThreadState>>,
    /// Task result.
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

/// Snapshot of a thread's state at a checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadState {
    /// State values.
    #[serde(default)]
    pub values: serde_json::Value,
    /// Nodes to execute next.
    #[serde(default)]
    pub next: Vec<String>,
    /// Checkpoint of this state.
    pub checkpoint: Checkpoint,
    /// State metadata.
    #[serde(default)]
    pub metadata: Json,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Parent checkpoint.
    #[serde(default)]
    pub parent_checkpoint: Option<Checkpoint>,
    /// Tasks to execute in this step.
    #[serde(default)]
    pub tasks: Vec<ThreadTask>,
}

/// Response to a state update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadUpdateStateResponse {
    /// Checkpoint of the new state.
    pub checkpoint: Checkpoint,
}

/// Request to create a thread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateThreadRequest {
    /// Thread metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Json>,
    /// Explicit thread ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Behavior if the ID already exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_exists: Option<OnConflictBehavior>,
}

/// Request to update a thread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateThreadRequest {
    /// Metadata to merge.
    pub metadata: Json,
}

/// Request to search threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchThreadsRequest {
    /// Metadata filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Json>,
    /// State values filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Json>,
    /// Status filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ThreadStatus>,
    /// Maximum results.
    pub limit: u32,
    /// Results to skip.
    pub offset: u32,
}

impl Default for SearchThreadsRequest {
    fn default() -> Self {
        Self {
            metadata: None,
            values: None,
            status: None,
            limit: 10,
            offset: 0,
        }
    }
}

/// Request to update a thread's state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStateRequest {
    /// Values to write.
    pub values: serde_json::Value,
    /// Node the update is attributed to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_node: Option<String>,
    /// Checkpoint to update from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<Checkpoint>,
    /// Checkpoint ID to update from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_id: Option<String>,
}

/// Request for a thread's state history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadHistoryRequest {
    /// Maximum states to return.
    pub limit: u32,
    /// Only states before this checkpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,
    /// Metadata filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Json>,
    /// Checkpoint to list from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<Checkpoint>,
}

impl Default for ThreadHistoryRequest {
    fn default() -> Self {
        Self {
            limit: 10,
            before: None,
            metadata: None,
            checkpoint: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Runs
// ─────────────────────────────────────────────────────────────────────────────

/// A single invocation of an assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Run ID.
    pub run_id: String,
    /// Thread the run belongs to.
    pub thread_id: String,
    /// Assistant used for the run.
    pub assistant_id: String,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
    /// Run status.
    pub status: RunStatus,
    /// Run metadata.
    #[serde(default)]
    pub metadata: Json,
    /// Strategy for concurrent runs on the same thread.
    #[serde(default)]
    pub multitask_strategy: Option<MultitaskStrategy>,
}

/// Parameters for creating, streaming or waiting on a run.
///
/// Unset fields are omitted from the request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunCreate {
    /// Assistant ID or graph name.
    pub assistant_id: String,
    /// Graph input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
    /// Command to execute instead of input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Command>,
    /// Stream modes (streaming only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stream_mode: Vec<StreamMode>,
    /// Include subgraph output (streaming only).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stream_subgraphs: bool,
    /// Run metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Json>,
    /// Assistant config override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GraphConfig>,
    /// Checkpoint to resume from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<Checkpoint>,
    /// Checkpoint ID to resume from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint_id: Option<String>,
    /// Nodes to interrupt before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupt_before: Option<InterruptNodes>,
    /// Nodes to interrupt after.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupt_after: Option<InterruptNodes>,
    /// Feedback keys (streaming only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feedback_keys: Vec<String>,
    /// Webhook called when the run finishes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
    /// Strategy for concurrent runs on the thread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multitask_strategy: Option<MultitaskStrategy>,
    /// Missing-thread behavior.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_not_exists: Option<IfNotExists>,
    /// Disconnect behavior.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_disconnect: Option<DisconnectMode>,
    /// Thread handling for stateless runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_completion: Option<OnCompletionBehavior>,
    /// Seconds to wait before starting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_seconds: Option<u64>,
}

impl RunCreate {
    /// Start a run of the given assistant.
    pub fn new(assistant_id: impl Into<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            ..Default::default()
        }
    }

    /// Set the graph input.
    pub fn with_input(mut self, input: serde_json::Value) -> Self {
        self.input = Some(input);
        self
    }

    /// Resume or redirect with a command.
    pub fn with_command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    /// Set the stream modes.
    pub fn with_stream_mode(mut self, modes: impl IntoIterator<Item = StreamMode>) -> Self {
        self.stream_mode = modes.into_iter().collect();
        self
    }

    /// Attach run metadata.
    pub fn with_metadata(mut self, metadata: Json) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Override the assistant config.
    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the multitask strategy.
    pub fn with_multitask_strategy(mut self, strategy: MultitaskStrategy) -> Self {
        self.multitask_strategy = Some(strategy);
        self
    }
}

/// Query parameters for listing runs.
#[derive(Debug, Clone, Serialize)]
pub struct ListRunsQuery {
    /// Maximum results.
    pub limit: u32,
    /// Results to skip.
    pub offset: u32,
    /// Status filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
}

impl Default for ListRunsQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            status: None,
        }
    }
}

/// Body of a cancel request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelRunRequest {
    /// Wait for the run to stop before responding.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub wait: bool,
    /// How to cancel.
    pub action: CancelAction,
}

// ─────────────────────────────────────────────────────────────────────────────
// Crons
// ─────────────────────────────────────────────────────────────────────────────

/// A scheduled run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cron {
    /// Cron ID.
    pub cron_id: String,
    /// Thread the cron runs on.
    #[serde(default)]
    pub thread_id: Option<String>,
    /// When to stop running.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Cron schedule expression.
    pub schedule: String,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
    /// Run payload used for each tick.
    #[serde(default)]
    pub payload: Json,
}

/// Request to create a cron job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCronRequest {
    /// Assistant ID or graph name.
    pub assistant_id: String,
    /// Cron schedule expression.
    pub schedule: String,
    /// Graph input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
    /// Run metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Json>,
    /// Assistant config override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GraphConfig>,
    /// Nodes to interrupt before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupt_before: Option<InterruptNodes>,
    /// Nodes to interrupt after.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupt_after: Option<InterruptNodes>,
    /// Webhook called after each run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
    /// Strategy for concurrent runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multitask_strategy: Option<MultitaskStrategy>,
}

/// Request to search cron jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCronsRequest {
    /// Assistant filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    /// Thread filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Maximum results.
    pub limit: u32,
    /// Results to skip.
    pub offset: u32,
}

impl Default for SearchCronsRequest {
    fn default() -> Self {
        Self {
            assistant_id: None,
            thread_id: None,
            limit: 10,
            offset: 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// A stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Namespace path.
    pub namespace: Vec<String>,
    /// Key within the namespace.
    pub key: String,
    /// Stored value.
    pub value: Json,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
}

/// A search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    /// The matching item.
    #[serde(flatten)]
    pub item: Item,
    /// Relevance score.
    #[serde(default)]
    pub score: Option<f64>,
}

/// Search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItemsResponse {
    /// Matching items.
    pub items: Vec<SearchItem>,
}

/// Namespace listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListNamespaceResponse {
    /// Namespace paths.
    pub namespaces: Vec<Vec<String>>,
}

/// Request to store an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PutItemRequest {
    /// Namespace path.
    pub namespace: Vec<String>,
    /// Key within the namespace.
    pub key: String,
    /// Value to store.
    pub value: Json,
    /// Indexing control: `false` to skip, or a list of fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<serde_json::Value>,
    /// Time to live, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

/// Request to search items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItemsRequest {
    /// Namespace prefix to search under.
    pub namespace_prefix: Vec<String>,
    /// Value filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Json>,
    /// Maximum results.
    pub limit: u32,
    /// Results to skip.
    pub offset: u32,
    /// Natural-language query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Refresh TTLs of returned items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_ttl: Option<bool>,
}

impl Default for SearchItemsRequest {
    fn default() -> Self {
        Self {
            namespace_prefix: Vec::new(),
            filter: None,
            limit: 10,
            offset: 0,
            query: None,
            refresh_ttl: None,
        }
    }
}

/// Request to list namespaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListNamespacesRequest {
    /// Prefix filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Vec<String>>,
    /// Suffix filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<Vec<String>>,
    /// Maximum depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    /// Maximum results.
    pub limit: u32,
    /// Results to skip.
    pub offset: u32,
}

impl Default for ListNamespacesRequest {
    fn default() -> Self {
        Self {
            prefix: None,
            suffix: None,
            max_depth: None,
            limit: 100,
            offset: 0,
        }
    }
}
