//! Per-invocation ambient credential slot.
//!
//! Backed by a tokio task-local, so the value is bound to the future that
//! handles one inbound invocation. Interleaved or parallel invocations each
//! see only their own value, and the slot disappears when the scoped future
//! completes, fails, or is dropped.
//!
//! Work moved onto a separately spawned task does not inherit the slot; the
//! caller must re-enter [`scope`] there if the credential is still needed.

use std::future::Future;

use crate::credential::Credential;

tokio::task_local! {
    static CURRENT_CREDENTIAL: Option<Credential>;
}

/// Runs `fut` with `credential` installed as the ambient credential.
///
/// Passing `None` still opens a scope: code inside observes "no credential"
/// even if an outer scope had one.
pub async fn scope<F>(credential: Option<Credential>, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_CREDENTIAL.scope(credential, fut).await
}

/// Returns the ambient credential of the current invocation, if any.
#[must_use]
pub fn current() -> Option<Credential> {
    CURRENT_CREDENTIAL.try_with(Clone::clone).ok().flatten()
}

/// Returns `true` when called from inside a [`scope`].
#[must_use]
pub fn in_scope() -> bool {
    CURRENT_CREDENTIAL.try_with(|_| ()).is_ok()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn cred(s: &str) -> Option<Credential> {
        Credential::new(s)
    }

    #[tokio::test]
    async fn unset_outside_scope() {
        assert!(current().is_none());
        assert!(!in_scope());
    }

    #[tokio::test]
    async fn scope_installs_and_releases() {
        let seen = scope(cred("abc123"), async { current() }).await;
        assert_eq!(seen, cred("abc123"));
        assert!(current().is_none());
    }

    #[tokio::test]
    async fn none_scope_shadows_outer_value() {
        let inner = scope(cred("outer"), async {
            scope(None, async { (in_scope(), current()) }).await
        })
        .await;
        assert_eq!(inner, (true, None));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_scopes_are_isolated() {
        let mut handles = Vec::new();
        for i in 0..32u64 {
            handles.push(tokio::spawn(async move {
                let token = format!("token-{i}");
                scope(cred(&token), async move {
                    for step in 0..10u64 {
                        tokio::time::sleep(Duration::from_millis((i * 7 + step) % 5)).await;
                        tokio::task::yield_now().await;
                        assert_eq!(current().unwrap().expose(), token);
                    }
                })
                .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn interleaved_on_one_task_are_isolated() {
        let a = scope(cred("a"), async {
            tokio::task::yield_now().await;
            current()
        });
        let b = scope(cred("b"), async {
            tokio::task::yield_now().await;
            current()
        });
        let (a, b) = tokio::join!(a, b);
        assert_eq!(a, cred("a"));
        assert_eq!(b, cred("b"));
    }

    #[tokio::test]
    async fn spawned_task_does_not_inherit() {
        let inherited = scope(cred("parent"), async {
            tokio::spawn(async { current() }).await.unwrap()
        })
        .await;
        assert!(inherited.is_none());
    }
}
