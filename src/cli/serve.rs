//! `serve`: run the relay until a shutdown signal, then drain.

use std::sync::Arc;

use tokio::net::TcpListener;

use super::CliError;
use crate::config::EnvConfig;
use crate::relay::{self, RelayState};
use crate::shutdown::{self, ShutdownCoordinator};

pub async fn run_serve(env: &EnvConfig) -> Result<(), CliError> {
    let coordinator = Arc::new(ShutdownCoordinator::new());
    let state = RelayState::new(&env.relay, Arc::clone(&coordinator))?;
    let listener = TcpListener::bind(env.relay_addr).await?;

    let drain = env.shutdown_drain;
    let signal_task = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            shutdown::wait_for_signal().await;
            coordinator.initiate(drain).await
        })
    };

    let served = relay::serve(listener, state, coordinator.stop_token()).await;
    signal_task.abort();
    served.map_err(CliError::from)
}
