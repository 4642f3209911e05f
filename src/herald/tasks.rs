// SPDX-License-Identifier: MIT

//! Task commands executed on behalf of API requests

use crate::base::error::{HeraldError, TaskError};
use crate::base::messenger::Messenger;
use crate::herald::config::Units;
use crate::herald::messengers::MessengerRegistry;
use crate::herald::scheduler::{job, Scheduler};
use crate::herald::weather::{title_case, WeatherClient};
use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

/// A unit of work against the scheduler that logs its own outcome
#[async_trait]
pub trait Command: Send + Sync {
    type Output: Send;

    async fn execute(&self) -> Result<Self::Output, HeraldError>;

    /// Log the result of `execute`
    fn log(&self, outcome: &Result<Self::Output, HeraldError>);
}

/// Execute `command`, log the outcome and hand it back
pub async fn run_command<C: Command>(command: &C) -> Result<C::Output, HeraldError> {
    let outcome = command.execute().await;
    command.log(&outcome);
    outcome
}

/// What to deliver, where, and how often
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    pub receiver: String,
    pub city: String,
    pub messenger: String,
    pub units: String,
    pub interval: u64,
}

pub struct AddTaskCommand {
    scheduler: Scheduler,
    messengers: MessengerRegistry,
    weather: WeatherClient,
    spec: TaskSpec,
}

impl AddTaskCommand {
    pub fn new(
        scheduler: Scheduler,
        messengers: MessengerRegistry,
        weather: WeatherClient,
        spec: TaskSpec,
    ) -> Self {
        Self {
            scheduler,
            messengers,
            weather,
            spec,
        }
    }
}

#[async_trait]
impl Command for AddTaskCommand {
    type Output = String;

    async fn execute(&self) -> Result<String, HeraldError> {
        let messenger = self
            .messengers
            .get(&self.spec.messenger)
            .await
            .ok_or_else(|| TaskError::InvalidMessenger(self.spec.messenger.to_lowercase()))?;
        let units: Units = self.spec.units.parse()?;

        let weather = self.weather.clone();
        let receiver = self.spec.receiver.clone();
        let city = self.spec.city.clone();
        let report = job(move || {
            let weather = weather.clone();
            let messenger = messenger.clone();
            let receiver = receiver.clone();
            let city = city.clone();
            async move {
                match deliver_report(&weather, messenger.as_ref(), &receiver, &city, units).await {
                    Ok(true) => log::info!("Success."),
                    Ok(false) => log::warn!("Failed."),
                    Err(e) => log::warn!("{}", e),
                }
            }
        });

        let task_id = Uuid::new_v4().to_string();
        self.scheduler
            .add_job(&task_id, Duration::from_secs(self.spec.interval), report)
            .await?;
        Ok(task_id)
    }

    fn log(&self, outcome: &Result<String, HeraldError>) {
        let city = title_case(&self.spec.city);
        match outcome {
            Ok(task_id) => log::info!(
                "Task {} added successfully for {} every {} seconds",
                task_id,
                city,
                self.spec.interval
            ),
            Err(e) => log::warn!("Task not added for {}. Error: {}: {}", city, e.kind(), e),
        }
    }
}

pub struct ModifyTaskCommand {
    scheduler: Scheduler,
    task_id: String,
    interval: u64,
}

impl ModifyTaskCommand {
    pub fn new(scheduler: Scheduler, task_id: impl Into<String>, interval: u64) -> Self {
        Self {
            scheduler,
            task_id: task_id.into(),
            interval,
        }
    }
}

#[async_trait]
impl Command for ModifyTaskCommand {
    type Output = ();

    async fn execute(&self) -> Result<(), HeraldError> {
        self.scheduler
            .reschedule_job(&self.task_id, Duration::from_secs(self.interval))
            .await?;
        Ok(())
    }

    fn log(&self, outcome: &Result<(), HeraldError>) {
        match outcome {
            Ok(()) => log::info!("Task {} modified successfully", self.task_id),
            Err(e) => log::warn!("Task {} not modified. Error: {}: {}", self.task_id, e.kind(), e),
        }
    }
}

pub struct RemoveTaskCommand {
    scheduler: Scheduler,
    task_id: String,
}

impl RemoveTaskCommand {
    pub fn new(scheduler: Scheduler, task_id: impl Into<String>) -> Self {
        Self {
            scheduler,
            task_id: task_id.into(),
        }
    }
}

#[async_trait]
impl Command for RemoveTaskCommand {
    type Output = ();

    async fn execute(&self) -> Result<(), HeraldError> {
        self.scheduler.remove_job(&self.task_id).await?;
        Ok(())
    }

    fn log(&self, outcome: &Result<(), HeraldError>) {
        match outcome {
            Ok(()) => log::info!("Task {} removed successfully", self.task_id),
            Err(e) => log::warn!("Task {} not removed. Error: {}: {}", self.task_id, e.kind(), e),
        }
    }
}

/// Fetch the weather for `city` and send the report to `receiver`
pub async fn deliver_report(
    weather: &WeatherClient,
    messenger: &dyn Messenger,
    receiver: &str,
    city: &str,
    units: Units,
) -> Result<bool, HeraldError> {
    let current = weather.current(city, units).await?;
    messenger
        .send_message(receiver, &current.report(city, units))
        .await
}
