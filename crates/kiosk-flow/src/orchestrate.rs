//! The registration workflow, run strictly sequentially per attempt.
//!
//! One attempt moves through validation, existence, eligibility, duplicate
//! checks, the append write, and visibility verification; the first failure
//! short-circuits. The checks and the write are separate requests against a
//! store with no transactions, so two kiosks can still race each other
//! (accepted gap); the in-flight token only keeps one kiosk from racing
//! itself.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use kiosk_core::validate::{validate_code, validate_mobile, validate_name};
use kiosk_core::AppConfig;
use kiosk_sheets::{ScriptClient, SheetsClient, SheetsError, WriteCommand, WriteMode};

use crate::error::{Outcome, RegistrationError};
use crate::offers::resolve_offer;
use crate::registry::{
    code_assignment, code_exists, mobile_assignment, Assignment, RegistrationColumns,
};
use crate::verify::confirm_visibility;

/// Operator input for one registration attempt.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub code: String,
    pub mobile: String,
    /// Optional; empty means not provided.
    pub name: String,
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Validating,
    CheckingExistence,
    CheckingEligibility,
    CheckingDuplicates,
    Writing,
    Verifying,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::CheckingExistence => "checking_existence",
            Stage::CheckingEligibility => "checking_eligibility",
            Stage::CheckingDuplicates => "checking_duplicates",
            Stage::Writing => "writing",
            Stage::Verifying => "verifying",
        };
        f.write_str(name)
    }
}

/// RAII mutual-exclusion token: at most one registration per registrar.
struct FlightToken<'a>(&'a AtomicBool);

impl<'a> FlightToken<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then_some(Self(flag))
    }
}

impl Drop for FlightToken<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

enum WriteResult {
    Confirmed { offer_type: String },
    Unconfirmed,
}

/// Read-only diagnostic view of a code's current standing.
#[derive(Debug)]
pub struct CodeReport {
    pub exists: bool,
    pub offer: Result<String, RegistrationError>,
    pub assignment: Option<Assignment>,
}

/// Runs registration attempts against one configured store.
pub struct Registrar {
    config: AppConfig,
    sheets: SheetsClient,
    relay: ScriptClient,
    in_flight: AtomicBool,
}

impl Registrar {
    /// Builds the snapshot and relay clients from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] when either HTTP client cannot be constructed
    /// or the relay endpoint URL does not parse.
    pub fn new(config: AppConfig, mode: WriteMode) -> Result<Self, SheetsError> {
        let sheets = SheetsClient::new(config.read_timeout_secs)?;
        let relay = ScriptClient::new(&config.script_url, config.read_timeout_secs, mode)?;
        Ok(Self::with_clients(config, sheets, relay))
    }

    /// Assembles a registrar from pre-built clients (test seam).
    #[must_use]
    pub fn with_clients(config: AppConfig, sheets: SheetsClient, relay: ScriptClient) -> Self {
        Self {
            config,
            sheets,
            relay,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Runs one registration attempt to a terminal outcome.
    ///
    /// A second call while one attempt is still running fails fast with
    /// [`RegistrationError::InFlight`] instead of racing the in-flight
    /// write's uniqueness checks.
    pub async fn register(&self, request: &RegistrationRequest) -> Outcome {
        let Some(_token) = FlightToken::acquire(&self.in_flight) else {
            return Outcome::Failed(RegistrationError::InFlight);
        };

        match self.run(request).await {
            Ok(WriteResult::Confirmed { offer_type }) => {
                tracing::info!(code = %request.code, offer_type, "registration confirmed");
                Outcome::Succeeded { offer_type }
            }
            Ok(WriteResult::Unconfirmed) => {
                tracing::warn!(code = %request.code, "registration dispatched but unconfirmed");
                Outcome::Ambiguous
            }
            Err(e) => {
                tracing::info!(code = %request.code, error = %e, "registration failed");
                Outcome::Failed(e)
            }
        }
    }

    async fn run(&self, request: &RegistrationRequest) -> Result<WriteResult, RegistrationError> {
        let code = request.code.trim();
        let mobile = request.mobile.trim();
        let name = request.name.trim();
        let sheet_id = &self.config.sheet_id;

        tracing::debug!(stage = %Stage::Validating, code, "starting registration");
        validate_code(code)?;
        validate_mobile(mobile)?;
        validate_name(name)?;

        tracing::debug!(stage = %Stage::CheckingExistence, code, "checking master list");
        if !code_exists(&self.sheets, sheet_id, self.config.master_list_gid, code).await {
            return Err(RegistrationError::CodeNotFound);
        }

        tracing::debug!(stage = %Stage::CheckingEligibility, code, "resolving offer");
        let offer_type =
            resolve_offer(&self.sheets, sheet_id, self.config.offers_gid, code).await?;

        tracing::debug!(stage = %Stage::CheckingDuplicates, code, "checking registrations");
        let regs_gid = self.config.registrations_gid;
        if let Some(existing) = code_assignment(&self.sheets, sheet_id, regs_gid, code).await {
            return Err(RegistrationError::DuplicateCode {
                registered_to: existing.registered_to,
            });
        }
        if let Some(existing) = mobile_assignment(&self.sheets, sheet_id, regs_gid, mobile).await {
            return Err(RegistrationError::DuplicateMobile {
                registered_to: existing.registered_to,
            });
        }

        tracing::debug!(stage = %Stage::Writing, code, "appending registration row");
        let columns = self.registration_columns(sheet_id, regs_gid).await;
        let row = vec![
            code.to_owned(),
            mobile.to_owned(),
            name.to_owned(),
            "Assigned".to_owned(),
            offer_type.clone(),
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        ];
        let command = WriteCommand::append(sheet_id, regs_gid, columns.write_headers(), vec![row]);
        self.relay
            .submit(&command)
            .await
            .map_err(RegistrationError::WriteFailed)?;

        tracing::debug!(stage = %Stage::Verifying, code, "confirming visibility");
        let confirmed = confirm_visibility(
            &self.sheets,
            sheet_id,
            regs_gid,
            code,
            self.config.verify_attempts,
            Duration::from_millis(self.config.verify_base_delay_ms),
        )
        .await;

        if confirmed {
            Ok(WriteResult::Confirmed { offer_type })
        } else {
            Ok(WriteResult::Unconfirmed)
        }
    }

    /// Resolves the registration schema from a fresh snapshot; a failed read
    /// falls back to the canonical headers so the write can still proceed.
    async fn registration_columns(&self, sheet_id: &str, gid: u64) -> RegistrationColumns {
        match self.sheets.fetch_snapshot(sheet_id, gid).await {
            Ok(snapshot) => RegistrationColumns::resolve(&snapshot.columns),
            Err(e) => {
                tracing::warn!(gid, error = %e, "registration headers unreadable; using canonical");
                RegistrationColumns::resolve(&[])
            }
        }
    }

    /// Read-only standing of a code: existence, eligibility, and any current
    /// assignment. Performs no write.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Format`] when the code fails shape
    /// validation; remote checks report through the [`CodeReport`] fields.
    pub async fn inspect(&self, code: &str) -> Result<CodeReport, RegistrationError> {
        let code = code.trim();
        validate_code(code)?;
        let sheet_id = &self.config.sheet_id;

        let exists = code_exists(&self.sheets, sheet_id, self.config.master_list_gid, code).await;
        let offer = resolve_offer(&self.sheets, sheet_id, self.config.offers_gid, code).await;
        let assignment =
            code_assignment(&self.sheets, sheet_id, self.config.registrations_gid, code).await;

        Ok(CodeReport {
            exists,
            offer,
            assignment,
        })
    }
}
