use crate::ResultEngine;

use super::Engine;

impl Engine {
    /// Check that the database answers.
    pub async fn ping(&self) -> ResultEngine<()> {
        self.database.ping().await?;
        Ok(())
    }
}
