use std::io;
use std::thread::{self, JoinHandle};

/// Spawns a thread named `wallswitch-{name}`.
///
/// # Errors
///
/// Returns an error if the OS refuses to create the thread.
pub fn spawn_named_thread<F>(name: &str, task: F) -> io::Result<JoinHandle<()>>
where F: FnOnce() + Send + 'static {
    let thread_name = format!("wallswitch-{name}");

    thread::Builder::new().name(thread_name.clone()).spawn(task).inspect_err(|err| {
        tracing::error!(thread = %thread_name, error = %err, "failed to spawn thread");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_named_thread_sets_prefix() {
        let handle = spawn_named_thread("sample", || {
            assert_eq!(thread::current().name(), Some("wallswitch-sample"));
        })
        .unwrap();
        handle.join().unwrap();
    }
}
