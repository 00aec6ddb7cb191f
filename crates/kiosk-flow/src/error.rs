use kiosk_core::locale::MessageKey;
use kiosk_core::{ConfigError, FormatError};
use kiosk_sheets::SheetsError;
use thiserror::Error;

/// Why a registration attempt failed. Every remote-call failure is caught at
/// its call site and converted into one of these; none propagate as uncaught
/// transport errors.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    /// The scanned code is not in the master allow-list (or the list could
    /// not be read; that check fails closed).
    #[error("coupon code is not in the master list")]
    CodeNotFound,

    /// The offers region could not be read. Distinct from ineligibility.
    #[error("could not read offers: {0}")]
    OffersUnreadable(#[source] SheetsError),

    #[error("offer not active for this code")]
    OfferNotActive,

    #[error("offer not valid on this date")]
    OfferOutOfDate,

    #[error("code not eligible for any offer")]
    OfferNotMapped,

    #[error("coupon code already registered to {registered_to}")]
    DuplicateCode { registered_to: String },

    #[error("mobile number already registered to {registered_to}")]
    DuplicateMobile { registered_to: String },

    #[error("append command failed: {0}")]
    WriteFailed(#[source] SheetsError),

    /// A second registration was attempted while one was still running.
    #[error("another registration is already in progress")]
    InFlight,
}

impl RegistrationError {
    /// The operator-facing message key for this failure.
    #[must_use]
    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::Config(ConfigError::InvalidSheetUrl(_)) => MessageKey::InvalidSheetUrl,
            Self::Config(_) => MessageKey::ConfigMissing,
            Self::Format(FormatError::Code) => MessageKey::CodeFormat,
            Self::Format(FormatError::Mobile) => MessageKey::MobileFormat,
            Self::Format(FormatError::Name) => MessageKey::NameFormat,
            Self::CodeNotFound => MessageKey::CodeNotFound,
            Self::OffersUnreadable(_) => MessageKey::OffersUnreadable,
            Self::OfferNotActive => MessageKey::OfferNotActive,
            Self::OfferOutOfDate => MessageKey::OfferOutOfDate,
            Self::OfferNotMapped => MessageKey::OfferNotMapped,
            Self::DuplicateCode { .. } => MessageKey::DuplicateCode,
            Self::DuplicateMobile { .. } => MessageKey::DuplicateMobile,
            Self::WriteFailed(_) => MessageKey::WriteFailed,
            Self::InFlight => MessageKey::Busy,
        }
    }
}

/// Terminal state of one registration attempt.
#[derive(Debug)]
pub enum Outcome {
    /// The row was written and its visibility confirmed.
    Succeeded { offer_type: String },
    /// The write was dispatched but never confirmed visible within the retry
    /// budget. The row may or may not exist; do not resubmit automatically.
    Ambiguous,
    Failed(RegistrationError),
}

impl Outcome {
    /// The single operator-facing message key for this outcome.
    #[must_use]
    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::Succeeded { .. } => MessageKey::Registered,
            Self::Ambiguous => MessageKey::VerifyAmbiguous,
            Self::Failed(e) => e.message_key(),
        }
    }
}
