use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::problem::{
    error::{InvalidStopReason, ProblemError},
    location::Location,
    time_window::TimeWindow,
};

/// Informational tag carried through to the schedule, never weighted by the optimizer.
#[derive(
    Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, Default, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone)]
pub struct Stop {
    external_id: String,
    name: Option<String>,
    location: Location,
    time_window: TimeWindow,
    service_duration: SignedDuration,
    priority: Priority,
}

impl Stop {
    /// The depot is a stop without service whose window spans the whole shift.
    pub fn depot(external_id: impl Into<String>, location: Location, shift_length: SignedDuration) -> Self {
        Stop {
            external_id: external_id.into(),
            name: None,
            location,
            time_window: TimeWindow::new(SignedDuration::ZERO, shift_length),
            service_duration: SignedDuration::ZERO,
            priority: Priority::default(),
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn service_duration(&self) -> SignedDuration {
        self.service_duration
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub(crate) fn validate(&self) -> Result<(), ProblemError> {
        let invalid = |reason| ProblemError::InvalidStop {
            stop_id: self.external_id.clone(),
            reason,
        };

        if self.external_id.trim().is_empty() {
            return Err(invalid(InvalidStopReason::MissingId));
        }

        if !self.location.is_valid() {
            return Err(invalid(InvalidStopReason::InvalidCoordinates));
        }

        if !self.time_window.is_ordered() {
            return Err(invalid(InvalidStopReason::WindowStartAfterEnd));
        }

        if self.time_window.earliest().is_negative() {
            return Err(invalid(InvalidStopReason::NegativeWindow));
        }

        if self.service_duration.is_negative() {
            return Err(invalid(InvalidStopReason::NegativeServiceDuration));
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct StopBuilder {
    external_id: Option<String>,
    name: Option<String>,
    location: Option<Location>,
    time_window: Option<TimeWindow>,
    service_duration: Option<SignedDuration>,
    priority: Option<Priority>,
}

impl StopBuilder {
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> &mut StopBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut StopBuilder {
        self.name = Some(name.into());
        self
    }

    pub fn set_location(&mut self, location: Location) -> &mut StopBuilder {
        self.location = Some(location);
        self
    }

    pub fn set_time_window(&mut self, time_window: TimeWindow) -> &mut StopBuilder {
        self.time_window = Some(time_window);
        self
    }

    pub fn set_service_duration(&mut self, service_duration: SignedDuration) -> &mut StopBuilder {
        self.service_duration = Some(service_duration);
        self
    }

    pub fn set_priority(&mut self, priority: Priority) -> &mut StopBuilder {
        self.priority = Some(priority);
        self
    }

    /// A stop without a window is available for the whole day, the shift caps it later on.
    pub fn build(self) -> Result<Stop, ProblemError> {
        let external_id = self.external_id.unwrap_or_default();

        let location = self.location.ok_or_else(|| ProblemError::InvalidStop {
            stop_id: external_id.clone(),
            reason: InvalidStopReason::MissingLocation,
        })?;

        let stop = Stop {
            external_id,
            name: self.name,
            location,
            time_window: self
                .time_window
                .unwrap_or(TimeWindow::new(SignedDuration::ZERO, SignedDuration::from_hours(24))),
            service_duration: self.service_duration.unwrap_or(SignedDuration::ZERO),
            priority: self.priority.unwrap_or_default(),
        };

        stop.validate()?;

        Ok(stop)
    }
}
