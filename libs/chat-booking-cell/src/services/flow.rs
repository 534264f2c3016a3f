use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use appointment_cell::models::{AppointmentError, BookSlotRequest, BookingChannel};
use appointment_cell::services::SchedulingEngine;
use shared_config::AppConfig;
use shared_utils::wall_clock;

use crate::models::{ChatError, ChatReply, ChatSession, ChatStep, StartBookingRequest};
use crate::services::input::{ChatInput, InputParser};
use crate::services::session::{normalize_phone, SessionStore};

const DATE_PROMPT: &str = "Please enter your preferred date (DD/MM format, e.g. 15/07):";

/// Step handlers for chat-driven booking and cancellation. All conversation
/// state lives in the injected [`SessionStore`].
pub struct ChatBookingFlow {
    sessions: Arc<dyn SessionStore>,
    engine: Arc<SchedulingEngine>,
    parser: InputParser,
    session_ttl: Duration,
    preview_limit: usize,
}

impl ChatBookingFlow {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        engine: Arc<SchedulingEngine>,
        config: &AppConfig,
    ) -> Result<Self, ChatError> {
        Self::with_settings(
            sessions,
            engine,
            Duration::from_secs(config.chat_session_ttl_seconds),
            config.chat_slot_preview_limit,
        )
    }

    pub fn with_settings(
        sessions: Arc<dyn SessionStore>,
        engine: Arc<SchedulingEngine>,
        session_ttl: Duration,
        preview_limit: usize,
    ) -> Result<Self, ChatError> {
        let parser = InputParser::new().map_err(|e| ChatError::Internal(e.to_string()))?;
        Ok(Self {
            sessions,
            engine,
            parser,
            session_ttl,
            preview_limit: preview_limit.max(1),
        })
    }

    pub async fn start_booking(&self, sender: &str, request: StartBookingRequest) -> Result<ChatReply, ChatError> {
        let step = ChatStep::AwaitingDate {
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            workplace_id: request.workplace_id,
        };
        self.save(sender, step.clone()).await?;
        Ok(ChatReply::new(DATE_PROMPT, step))
    }

    pub async fn start_cancellation(&self, sender: &str, patient_id: Uuid) -> Result<ChatReply, ChatError> {
        let appointments = self
            .engine
            .lifecycle
            .list_patient_appointments(patient_id, true)
            .await?;

        if appointments.is_empty() {
            self.clear(sender).await?;
            return Ok(ChatReply::new(
                "You don't have any active appointments to cancel.",
                ChatStep::Idle,
            ));
        }

        let listing = appointments
            .iter()
            .enumerate()
            .map(|(i, a)| {
                format!(
                    "{}. {} at {}",
                    i + 1,
                    a.date.format("%a, %d/%m"),
                    wall_clock::format(&a.time)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let step = ChatStep::AwaitingCancellation {
            patient_id,
            appointment_ids: appointments.iter().map(|a| a.id).collect(),
        };
        self.save(sender, step.clone()).await?;

        Ok(ChatReply::new(
            format!(
                "Your appointments:\n\n{}\n\nReply with:\n- The number to cancel (e.g. '1')\n- 'ALL' to cancel all\n- 'CANCEL' to abort",
                listing
            ),
            step,
        ))
    }

    /// Advance the sender's conversation by one message. `today` is the sender's local date.
    pub async fn handle_message(&self, sender: &str, input: &str, today: NaiveDate) -> Result<ChatReply, ChatError> {
        let key = normalize_phone(sender);
        let step = self
            .sessions
            .get(&key)
            .await?
            .map(|session| session.step)
            .unwrap_or_default();

        debug!("Chat message from {} at step {:?}", key, step);

        let parsed = self.parser.classify(input, today);
        if parsed == ChatInput::Abort {
            self.clear(sender).await?;
            let reply = match step {
                ChatStep::AwaitingCancellation { .. } => "Appointment cancellation aborted.",
                ChatStep::Idle => "Nothing in progress.",
                _ => "Booking cancelled. Nothing was reserved.",
            };
            return Ok(ChatReply::new(reply, ChatStep::Idle));
        }

        match step {
            ChatStep::Idle => Ok(ChatReply::new(
                "No booking in progress. Start a new booking to choose a date.",
                ChatStep::Idle,
            )),
            ChatStep::AwaitingDate { patient_id, doctor_id, workplace_id } => {
                self.on_date(sender, parsed, today, patient_id, doctor_id, workplace_id).await
            }
            ChatStep::AwaitingSlot { patient_id, doctor_id, workplace_id, date, offered } => {
                self.on_slot(sender, input, patient_id, doctor_id, workplace_id, date, offered).await
            }
            ChatStep::AwaitingCancellation { patient_id, appointment_ids } => {
                self.on_cancellation(sender, parsed, patient_id, appointment_ids).await
            }
        }
    }

    async fn on_date(
        &self,
        sender: &str,
        parsed: ChatInput,
        today: NaiveDate,
        patient_id: Uuid,
        doctor_id: Uuid,
        workplace_id: Uuid,
    ) -> Result<ChatReply, ChatError> {
        let current = ChatStep::AwaitingDate { patient_id, doctor_id, workplace_id };

        let ChatInput::Date(date) = parsed else {
            return Ok(ChatReply::new("Invalid date format. Please use DD/MM (e.g. 15/07):", current));
        };

        if date < today {
            return Ok(ChatReply::new("That date has already passed. Please try another date:", current));
        }

        self.offer_slots(sender, patient_id, doctor_id, workplace_id, date, None).await
    }

    #[allow(clippy::too_many_arguments)]
    async fn on_slot(
        &self,
        sender: &str,
        input: &str,
        patient_id: Uuid,
        doctor_id: Uuid,
        workplace_id: Uuid,
        date: NaiveDate,
        offered: Vec<NaiveTime>,
    ) -> Result<ChatReply, ChatError> {
        let Some(time) = self.parser.parse_time(input) else {
            let current = ChatStep::AwaitingSlot { patient_id, doctor_id, workplace_id, date, offered };
            return Ok(ChatReply::new("Invalid time format. Please use HH:MM (e.g. 14:30):", current));
        };

        if !offered.contains(&time) {
            let current = ChatStep::AwaitingSlot { patient_id, doctor_id, workplace_id, date, offered };
            return Ok(ChatReply::new("Invalid time slot. Please choose from the list:", current));
        }

        let request = BookSlotRequest {
            doctor_id,
            patient_id,
            workplace_id,
            date,
            time,
            channel: BookingChannel::Chat,
            notes: Some(format!("Booked via chat from {}", normalize_phone(sender))),
        };

        match self.engine.book_slot(request).await {
            Ok(appointment) => {
                self.clear(sender).await?;
                info!("Chat booking {} confirmed for patient {}", appointment.id, patient_id);
                Ok(ChatReply::new(
                    format!(
                        "Appointment booked for {} at {}. You'll receive a reminder before your appointment.",
                        appointment.date.format("%A, %d/%m/%Y"),
                        wall_clock::format(&appointment.time)
                    ),
                    ChatStep::Idle,
                ))
            }
            Err(AppointmentError::SlotConflict) => {
                warn!("Chat slot {} {} taken before confirmation; re-offering", date, time);
                self.offer_slots(
                    sender,
                    patient_id,
                    doctor_id,
                    workplace_id,
                    date,
                    Some("Sorry, that slot was just taken."),
                )
                .await
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn offer_slots(
        &self,
        sender: &str,
        patient_id: Uuid,
        doctor_id: Uuid,
        workplace_id: Uuid,
        date: NaiveDate,
        preface: Option<&str>,
    ) -> Result<ChatReply, ChatError> {
        let slots = self.engine.get_available_slots(doctor_id, workplace_id, date).await?;
        let preface = preface.map(|p| format!("{} ", p)).unwrap_or_default();

        if slots.is_empty() {
            let step = ChatStep::AwaitingDate { patient_id, doctor_id, workplace_id };
            self.save(sender, step.clone()).await?;
            return Ok(ChatReply::new(
                format!("{}No available slots on this date. Please try another date:", preface),
                step,
            ));
        }

        let offered: Vec<NaiveTime> = slots
            .iter()
            .take(self.preview_limit)
            .map(|slot| slot.start_time)
            .collect();
        let listing = offered
            .iter()
            .map(|time| format!("• {}", wall_clock::format(time)))
            .collect::<Vec<_>>()
            .join("\n");

        let step = ChatStep::AwaitingSlot { patient_id, doctor_id, workplace_id, date, offered };
        self.save(sender, step.clone()).await?;

        Ok(ChatReply::new(
            format!(
                "{}Available slots on {}:\n\n{}\n\nReply with your preferred time (e.g. 14:30)",
                preface,
                date.format("%A, %d/%m"),
                listing
            ),
            step,
        ))
    }

    async fn on_cancellation(
        &self,
        sender: &str,
        parsed: ChatInput,
        patient_id: Uuid,
        appointment_ids: Vec<Uuid>,
    ) -> Result<ChatReply, ChatError> {
        let targets: Vec<Uuid> = match parsed {
            ChatInput::All => appointment_ids.clone(),
            ChatInput::Choice(n) if (1..=appointment_ids.len()).contains(&n) => vec![appointment_ids[n - 1]],
            _ => {
                let current = ChatStep::AwaitingCancellation { patient_id, appointment_ids };
                return Ok(ChatReply::new(
                    "Invalid choice. Please try again or type 'CANCEL' to abort.",
                    current,
                ));
            }
        };

        let mut cancelled = Vec::with_capacity(targets.len());
        for id in targets {
            match self
                .engine
                .cancel_appointment(id, Some("Cancelled via chat".to_string()))
                .await
            {
                Ok(appointment) => cancelled.push(appointment),
                Err(AppointmentError::NotFound) | Err(AppointmentError::InvalidStatusTransition { .. }) => {
                    warn!("Appointment {} no longer cancellable; skipping", id);
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.clear(sender).await?;

        let reply = match cancelled.as_slice() {
            [] => "Those appointments were already closed. Nothing was changed.".to_string(),
            [one] => format!(
                "Appointment on {} at {} has been cancelled.",
                one.date.format("%a, %d/%m"),
                wall_clock::format(&one.time)
            ),
            many => format!("All {} appointments have been cancelled.", many.len()),
        };
        Ok(ChatReply::new(reply, ChatStep::Idle))
    }

    async fn save(&self, sender: &str, step: ChatStep) -> Result<(), ChatError> {
        self.sessions
            .put(&normalize_phone(sender), &ChatSession::new(step), self.session_ttl)
            .await
    }

    async fn clear(&self, sender: &str) -> Result<(), ChatError> {
        self.sessions.remove(&normalize_phone(sender)).await
    }
}
