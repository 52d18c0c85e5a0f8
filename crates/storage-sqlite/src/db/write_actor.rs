use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use std::any::Any;
use tenorvest_core::errors::{Error, Result};
use tokio::sync::{mpsc, oneshot};

// A write job runs against the actor's connection inside one immediate transaction.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type ErasedJob = (
    Job<Box<dyn Any + Send + 'static>>,
    oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>,
);

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<ErasedJob>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside an immediate transaction. Returning `Err` rolls
    /// the whole job back and hands the same error to the caller.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| Error::Unexpected("database writer has stopped".to_string()))?;

        let boxed = ret_rx.await.map_err(|_| {
            Error::Unexpected("database writer dropped a job without replying".to_string())
        })??;

        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| Error::Unexpected("database writer returned an unexpected type".to_string()))
    }
}

/// Spawns a background Tokio task that acts as a single writer to the database.
///
/// The actor owns one pooled connection for its whole life and processes
/// jobs serially. Fails when no connection can be taken from the pool.
pub fn spawn_writer(pool: &DbPool) -> Result<WriteHandle> {
    let mut conn = pool.get().map_err(StorageError::from)?;
    let (tx, mut rx) = mpsc::channel::<ErasedJob>(1024);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            // The caller may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
        log::debug!("Database writer stopped");
    });

    Ok(WriteHandle { tx })
}
