pub use crate::agent::{Agent, AgentBody};
pub use crate::behaviors::SteeringBehavior;
pub use crate::context::SteeringContext;
pub use crate::plugin::{AgentComponent, SteeringPlugin};
pub use crate::presets::{self, ContextBuilder};
pub use crate::system::{
    AgentDestroyed, AgentLifecycle, AgentStarted, AgentSystem, SteeringEnv,
};
pub use crate::AgentId;
