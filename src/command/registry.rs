use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::command::executor::{backend_error, Verb};
use crate::error::Result;
use crate::traits::BackendConnection;

/// Content-derived id of a statement template: lowercase hex SHA-256.
/// Identical text yields the same id in every process.
pub fn statement_id(template: &str) -> String {
    hex::encode(Sha256::digest(template.as_bytes()))
}

/// Register-once gate for prepared statements.
///
/// The gate lives in the backend's own key space, so it is shared by every
/// caller of the same backend regardless of process. No local cache is kept.
#[derive(Debug, Clone)]
pub struct StatementRegistry {
    key_prefix: String,
}

impl StatementRegistry {
    pub fn new(key_prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
        }
    }

    /// Key the gate sets for statement `id` in database `db_name`.
    /// Statements are registered per database, so the gate is too.
    pub fn gate_key(&self, db_name: &str, id: &str) -> String {
        format!("{}{}:{}", self.key_prefix, db_name, id)
    }

    /// Makes sure `template` is registered with the backend and returns its id.
    ///
    /// Whoever wins the set-if-absent on the gate key issues CREATE_STATEMENT;
    /// everyone else goes straight to execution. A loser can therefore reach
    /// the backend before the winner's CREATE_STATEMENT lands and get a
    /// "statement not found" error; see `ClientOptions::statement_retries`.
    pub async fn ensure_registered(
        &self,
        conn: &mut dyn BackendConnection,
        db_name: &str,
        template: &str,
    ) -> Result<String> {
        let id = statement_id(template);
        let key = self.gate_key(db_name, &id);

        let won = conn
            .set_if_absent(&key, "1")
            .await
            .map_err(|err| backend_error("SETNX", err))?;
        if !won {
            debug!(target: "redisql", statement = %id, "statement already registered");
            return Ok(id);
        }

        debug!(target: "redisql", statement = %id, db = %db_name, "registering statement");
        let created = conn
            .call(
                Verb::CreateStatement.as_str(),
                vec![db_name.to_string(), id.clone(), template.to_string()],
            )
            .await;

        if let Err(err) = created {
            if err.is_statement_already_exists() {
                debug!(
                    target: "redisql",
                    statement = %id,
                    db = %db_name,
                    "statement already on backend"
                );
                return Ok(id);
            }
            // The gate must not outlive a failed registration.
            warn!(
                target: "redisql",
                statement = %id,
                error = %err,
                "statement registration failed, releasing gate"
            );
            if let Err(del_err) = conn.delete(&key).await {
                warn!(
                    target: "redisql",
                    key = %key,
                    error = %del_err,
                    "failed to release statement gate"
                );
            }
            return Err(backend_error(Verb::CreateStatement.as_str(), err));
        }

        Ok(id)
    }
}

impl Default for StatementRegistry {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_STATEMENT_KEY_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_id_is_deterministic() {
        let a = statement_id("SELECT id FROM t WHERE id = ?1");
        let b = statement_id("SELECT id FROM t WHERE id = ?1");
        let c = statement_id("SELECT id FROM t WHERE id = ?2");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_gate_key_uses_prefix() {
        let registry = StatementRegistry::new("app:");
        assert_eq!(registry.gate_key("main", "abc"), "app:main:abc");
        assert_ne!(registry.gate_key("main", "abc"), registry.gate_key("other", "abc"));
    }
}
