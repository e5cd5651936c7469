//! Listener and lifecycle: socket setup, the accept loop, and the
//! stop/join semantics of a running engine.

use std::io;
use std::net::SocketAddr;
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};

use tokio::net::{TcpListener, TcpSocket};
use tokio::runtime;
use tracing::{debug, info, warn};

use super::config::ServerConfig;
use super::session::run_session;
use crate::router::Router;

/// Handle to a running engine.
///
/// Owns the reactor runtime and its worker threads. [`ServerHandle::stop`]
/// is idempotent and also runs implicitly when the handle is dropped, so a
/// server cannot outlive its handle.
pub struct ServerHandle {
    lifetime: Arc<ServerLifetime>,
}

/// Reactor plus worker threads; torn down exactly once, by whichever of
/// `stop()` or `Drop` comes first.
struct ServerLifetime {
    runtime: Mutex<Option<runtime::Runtime>>,
    stopped: Mutex<bool>,
    joined: Condvar,
}

impl ServerHandle {
    /// Stop the reactor and join every worker thread.
    ///
    /// Pending accept/read/write operations unwind as the reactor shuts
    /// down. Calling `stop` again, or dropping the handle afterwards, is a
    /// no-op.
    pub fn stop(&self) {
        let runtime = self.lifetime.runtime.lock().unwrap().take();
        if let Some(runtime) = runtime {
            // Dropping the runtime blocks until every worker thread has
            // unwound and joined.
            drop(runtime);
            info!("server stopped");
            let mut stopped = self.lifetime.stopped.lock().unwrap();
            *stopped = true;
            self.lifetime.joined.notify_all();
        }
    }

    /// Block until all worker threads have exited, without forcing a stop.
    pub fn wait(&self) {
        let mut stopped = self.lifetime.stopped.lock().unwrap();
        while !*stopped {
            stopped = self.lifetime.joined.wait(stopped).unwrap();
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start the engine: bind, listen, and begin accepting sessions.
///
/// Blocks until the listener is actively bound and accepting, so a caller
/// never observes a started server whose socket cannot take connections.
///
/// # Errors
///
/// An unparseable listen address, a failure to build the reactor, or any
/// bind/listen failure surfaced through the readiness channel.
pub fn serve(router: Router, config: &ServerConfig) -> io::Result<ServerHandle> {
    let workers = config.workers.max(1);
    let runtime = runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .thread_name("restkit-worker")
        .enable_io()
        .enable_time()
        .build()?;

    let addr: SocketAddr = format!("{}:{}", config.address, config.port)
        .parse()
        .map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid listen address: {err}"),
            )
        })?;

    let router = Arc::new(router);
    let (ready_tx, ready_rx) = mpsc::sync_channel(1);
    runtime.spawn(listen(addr, router, ready_tx));

    // One-shot readiness: the accept loop reports only after the socket is
    // bound and listening, and bind errors propagate to the caller here.
    match ready_rx.recv() {
        Ok(Ok(())) => {}
        Ok(Err(err)) => return Err(err),
        Err(_) => {
            return Err(io::Error::other("listener task exited before readiness"));
        }
    }

    info!(address = %addr, workers, "server listening");

    Ok(ServerHandle {
        lifetime: Arc::new(ServerLifetime {
            runtime: Mutex::new(Some(runtime)),
            stopped: Mutex::new(false),
            joined: Condvar::new(),
        }),
    })
}

fn bind_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(libc::SOMAXCONN as u32)
}

async fn listen(
    addr: SocketAddr,
    router: Arc<Router>,
    ready_tx: mpsc::SyncSender<io::Result<()>>,
) {
    let listener = match bind_listener(addr) {
        Ok(listener) => {
            let _ = ready_tx.send(Ok(()));
            listener
        }
        Err(err) => {
            let _ = ready_tx.send(Err(err));
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!(%peer, "connection accepted");
                let router = router.clone();
                tokio::spawn(async move {
                    if let Err(err) = run_session(stream, router).await {
                        // Clean disconnects never reach here; this is a
                        // frame or socket error.
                        debug!(%peer, error = %err, "session ended with error");
                    }
                });
            }
            Err(err) => {
                warn!(error = %err, "accept failed");
            }
        }
    }
}
