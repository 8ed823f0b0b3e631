pub mod server;
pub mod sign_in;
pub mod sign_out;

mod run;

#[derive(Debug)]
pub enum Action {
    Server(server::Args),
    SignIn(sign_in::Args),
    SignOut(sign_out::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
