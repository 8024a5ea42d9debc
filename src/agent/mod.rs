//! Conversational agents that combine a model with a tool registry.
//!
//! An [`Agent`] keeps the running conversation, talks to a [`Model`], and turns
//! `CALL TOOL: <name> <input>` directives in model output into tool calls.
//!
//! Agents are single-owner: history is read and appended without any locking,
//! so one agent serves one conversation. When several nodes need the same agent,
//! share it as a [`SharedAgent`]; for concurrent conversations build one agent each.

pub mod agent_model;
pub mod directive;
pub mod middleware;
pub mod nodes;

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::context::Context;
use crate::core::error::FlowError;
use crate::llm::{Model, ModelRequest};
use crate::tools::{Tool, ToolRegistry};
use directive::Segment;
use middleware::AgentMiddleware;

pub use agent_model::AgentModel;
pub use nodes::{LlmNode, ToolNode};

/// An agent guarded for use from several nodes or an [`AgentModel`].
pub type SharedAgent = Arc<Mutex<Agent>>;

/// Who produced a turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    System,
    User,
    Assistant,
    ToolCall(String),
    ToolResponse(String),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => f.write_str("System"),
            Role::User => f.write_str("User"),
            Role::Assistant => f.write_str("Assistant"),
            Role::ToolCall(tool) => write!(f, "Tool Call ({})", tool),
            Role::ToolResponse(tool) => write!(f, "Tool Response ({})", tool),
        }
    }
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Sampling parameters and instructions applied to every model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 150,
            top_p: 0.9,
            system_prompt: None,
        }
    }
}

pub struct Agent {
    id: Uuid,
    model: Arc<dyn Model>,
    config: AgentConfig,
    history: Vec<ConversationMessage>,
    tools: ToolRegistry,
    middleware: Vec<Arc<dyn AgentMiddleware>>,
}

impl Agent {
    /// Creates an agent with an empty history, no tools and the default config.
    pub fn new(model: Arc<dyn Model>) -> Self {
        Agent {
            id: Uuid::new_v4(),
            model,
            config: AgentConfig::default(),
            history: Vec::new(),
            tools: ToolRegistry::new(),
            middleware: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Appends `middleware` to the end of the chain.
    pub fn with_middleware(mut self, middleware: Arc<dyn AgentMiddleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register_tool(tool);
        self
    }

    /// Wraps the agent for sharing between nodes.
    pub fn shared(self) -> SharedAgent {
        Arc::new(Mutex::new(self))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }

    pub fn history(&self) -> &[ConversationMessage] {
        &self.history
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn append_message(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(ConversationMessage::new(role, content));
    }

    /// Clears the conversation history. Tools and config are kept.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) {
        self.tools.register(tool);
    }

    /// Renders the full history as a prompt, one `Role: content` line per turn.
    pub fn build_prompt(&self) -> String {
        self.render_prompt(&self.history)
    }

    fn render_prompt(&self, history: &[ConversationMessage]) -> String {
        let mut prompt = String::new();
        if let Some(system) = &self.config.system_prompt {
            let _ = writeln!(prompt, "{}: {}", Role::System, system);
        }
        for msg in history {
            let _ = writeln!(prompt, "{}: {}", msg.role, msg.content);
        }
        prompt
    }

    /// Sends a user message and returns the model's reply.
    ///
    /// When the reply is nothing but a single tool directive, the tool is run
    /// and its output is appended to the reply as `Tool Output (<name>): <output>`.
    /// A failing directive leaves the reply untouched.
    pub async fn send(&mut self, ctx: &Context, user_input: &str) -> Result<String, FlowError> {
        self.append_message(Role::User, user_input);

        let mut working = self.history.clone();
        for middleware in &self.middleware {
            middleware.before_send(&mut working);
        }

        let request = ModelRequest {
            prompt: self.render_prompt(&working),
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
            top_p: Some(self.config.top_p),
            context: None,
        };

        log::debug!(
            "Agent {} sending {} turns to {}",
            self.id,
            working.len(),
            self.model.model_name()
        );
        let response = self.model.generate(ctx, request).await?;

        let text = self
            .middleware
            .iter()
            .fold(response.text, |text, middleware| middleware.after_receive(text));
        self.append_message(Role::Assistant, text.clone());

        if let Some(directive) = directive::parse_single(&text) {
            match self.call_tool(ctx, directive.tool, directive.input).await {
                Ok(output) if !output.is_empty() => {
                    return Ok(format!(
                        "{}\nTool Output ({}): {}",
                        text, directive.tool, output
                    ));
                }
                Ok(_) => {}
                Err(err) => log::warn!(
                    "Agent {} could not resolve directive for '{}': {}",
                    self.id,
                    directive.tool,
                    err
                ),
            }
        }

        Ok(text)
    }

    /// Runs a registered tool and records the call and its response in the history.
    pub async fn call_tool(
        &mut self,
        ctx: &Context,
        tool_name: &str,
        input: &str,
    ) -> Result<String, FlowError> {
        self.tools.get(tool_name)?;
        self.append_message(Role::ToolCall(tool_name.to_string()), input);

        let output = self.tools.execute(ctx, tool_name, input).await?;

        self.append_message(Role::ToolResponse(tool_name.to_string()), output.clone());
        Ok(output)
    }

    /// Replaces every tool directive in `text` with the tool's output.
    ///
    /// Each directive becomes `Tool Output (<name>): <output>`. Directives that
    /// name an unknown tool, fail, or produce no output stay in the text verbatim.
    /// This never fails.
    pub async fn resolve_directives(&mut self, ctx: &Context, text: &str) -> String {
        let mut resolved = String::with_capacity(text.len());
        for segment in directive::scan(text) {
            let directive = match segment {
                Segment::Literal(literal) => {
                    resolved.push_str(literal);
                    continue;
                }
                Segment::Directive(directive) => directive,
            };

            log::debug!(
                "Agent {} detected tool directive '{}' with input '{}'",
                self.id,
                directive.tool,
                directive.input
            );
            match self.call_tool(ctx, directive.tool, directive.input).await {
                Ok(output) if !output.is_empty() => {
                    let _ = write!(resolved, "Tool Output ({}): {}", directive.tool, output);
                }
                Ok(_) => resolved.push_str(directive.raw),
                Err(err) => {
                    log::warn!(
                        "Agent {} failed to execute tool '{}': {}",
                        self.id,
                        directive.tool,
                        err
                    );
                    resolved.push_str(directive.raw);
                }
            }
        }
        resolved
    }
}
