//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and runs multi-step operations (schedule
//! replacement, booking) atomically. Closures receive a [`TransactionContext`]
//! whose repositories all share one database transaction.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    AppointmentRepository, AppointmentStore, ServiceRepository, ServiceStore,
    TxAppointmentRepository, TxServiceRepository, TxWorkingHourRepository, UserRepository,
    UserStore, WorkingHourRepository, WorkingHourStore,
};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction methods; tests
/// provide an in-memory implementation instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync + 'static {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn services(&self) -> Arc<dyn ServiceRepository>;

    fn working_hours(&self) -> Arc<dyn WorkingHourRepository>;

    fn appointments(&self) -> Arc<dyn AppointmentRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    ///
    /// Committed when the closure returns `Ok`, rolled back otherwise.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;

    /// Execute a closure within a serializable transaction.
    ///
    /// Concurrent transactions that would observe each other's writes fail
    /// on commit; callers map that to a domain error.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access within a transaction.
pub struct TransactionContext<'a> {
    services: Box<dyn ServiceRepository + 'a>,
    working_hours: Box<dyn WorkingHourRepository + 'a>,
    appointments: Box<dyn AppointmentRepository + 'a>,
}

impl<'a> TransactionContext<'a> {
    /// Assemble a context from arbitrary repositories.
    pub fn new(
        services: Box<dyn ServiceRepository + 'a>,
        working_hours: Box<dyn WorkingHourRepository + 'a>,
        appointments: Box<dyn AppointmentRepository + 'a>,
    ) -> Self {
        Self {
            services,
            working_hours,
            appointments,
        }
    }

    fn for_transaction(txn: &'a DatabaseTransaction) -> Self {
        Self::new(
            Box::new(TxServiceRepository::new(txn)),
            Box::new(TxWorkingHourRepository::new(txn)),
            Box::new(TxAppointmentRepository::new(txn)),
        )
    }

    pub fn services(&self) -> &dyn ServiceRepository {
        self.services.as_ref()
    }

    pub fn working_hours(&self) -> &dyn WorkingHourRepository {
        self.working_hours.as_ref()
    }

    pub fn appointments(&self) -> &dyn AppointmentRepository {
        self.appointments.as_ref()
    }
}

/// SeaORM-backed UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    users: Arc<UserStore>,
    services: Arc<ServiceStore>,
    working_hours: Arc<WorkingHourStore>,
    appointments: Arc<AppointmentStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            services: Arc::new(ServiceStore::new(db.clone())),
            working_hours: Arc::new(WorkingHourStore::new(db.clone())),
            appointments: Arc::new(AppointmentStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let outcome = f(TransactionContext::for_transaction(&txn)).await;

        match outcome {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn services(&self) -> Arc<dyn ServiceRepository> {
        self.services.clone()
    }

    fn working_hours(&self) -> Arc<dyn WorkingHourRepository> {
        self.working_hours.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.appointments.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f).await
    }
}
