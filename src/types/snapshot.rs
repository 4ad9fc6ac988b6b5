//! Snapshot types pushed over the channel

use serde::{Deserialize, Serialize};

/// Tool invocation owned by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
    pub idx: String,
}

impl Tool {
    /// Create a new tool with empty input/output
    pub fn new(idx: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: String::new(),
            output: String::new(),
            idx: idx.into(),
        }
    }

    /// Create a tool with input and output
    pub fn with_io(
        idx: impl Into<String>,
        name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            output: output.into(),
            idx: idx.into(),
        }
    }
}

/// Agent node of an execution graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub output: String,
    pub idx: String,
}

impl Agent {
    /// Create a new agent without tools
    pub fn new(idx: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: Vec::new(),
            images: Vec::new(),
            output: String::new(),
            idx: idx.into(),
        }
    }

    /// Builder-style tool attachment
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Builder-style output
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }
}

/// One complete, self-contained graph state
///
/// `is_active` and `total_tokens` are carried through untouched; nothing in
/// the view reacts to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub timestamp: String,
    pub idx: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub total_tokens: u64,
    #[serde(default)]
    pub is_active: bool,
}

impl GraphSnapshot {
    /// Create an empty snapshot
    pub fn new(timestamp: impl Into<String>, idx: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            idx: idx.into(),
            query: String::new(),
            agents: Vec::new(),
            response: String::new(),
            total_tokens: 0,
            is_active: false,
        }
    }

    /// Builder-style agent attachment
    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    /// Number of agents
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Number of tools across all agents
    pub fn tool_count(&self) -> usize {
        self.agents.iter().map(|a| a.tools.len()).sum()
    }

    /// Iterate `(agent idx, tool idx)` pairs in snapshot order
    pub fn relations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.agents.iter().flat_map(|agent| {
            agent
                .tools
                .iter()
                .map(move |tool| (agent.idx.as_str(), tool.idx.as_str()))
        })
    }
}
