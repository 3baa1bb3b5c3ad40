/// Agent identifier - index into the agent store (0..N-1)
///
/// Firms have no identifier of their own: a firm is named by the id of its owner.
pub type AgentId = usize;

/// Simulation tick counter
pub type Tick = u64;

/// Outside-wage ceiling shared by every agent
pub const OMEGA: f64 = 1.0;
