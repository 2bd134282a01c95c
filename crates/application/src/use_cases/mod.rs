pub mod replay_traffic;

pub use replay_traffic::ReplayTrafficUseCase;
