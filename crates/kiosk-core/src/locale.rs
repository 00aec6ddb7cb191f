//! Operator-facing message tables for the two supported locales.
//!
//! The workflow selects a [`MessageKey`]; only this module maps keys to
//! text. Keys the deployment never translated fall back to English.

/// Supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    Ta,
}

/// One key per orchestration outcome or locally-detected error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    Registered,
    CodeFormat,
    MobileFormat,
    NameFormat,
    ConfigMissing,
    InvalidSheetUrl,
    CodeNotFound,
    OfferNotActive,
    OfferOutOfDate,
    OfferNotMapped,
    OffersUnreadable,
    DuplicateCode,
    DuplicateMobile,
    WriteFailed,
    VerifyAmbiguous,
    Busy,
}

/// Returns the localized text for `key` in `lang`.
#[must_use]
pub fn message(lang: Lang, key: MessageKey) -> &'static str {
    match lang {
        Lang::En => english(key),
        Lang::Ta => tamil(key).unwrap_or_else(|| english(key)),
    }
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Registered => "Customer registered successfully!",
        MessageKey::CodeFormat => "QR code must be exactly 6 digits.",
        MessageKey::MobileFormat => "Mobile number must be exactly 10 digits.",
        MessageKey::NameFormat => "Name must contain only letters and spaces.",
        MessageKey::ConfigMissing => "Please set the script URL and sheet URL.",
        MessageKey::InvalidSheetUrl => {
            "Invalid sheet URL. Paste the full link including gid."
        }
        MessageKey::CodeNotFound => {
            "Invalid QR code. Please enter a valid QR code from the sheet."
        }
        MessageKey::OfferNotActive => "Offer not active for this QR code.",
        MessageKey::OfferOutOfDate => "Offer not valid on this date.",
        MessageKey::OfferNotMapped => "QR code not eligible for any offer.",
        MessageKey::OffersUnreadable => "Could not read offers.",
        MessageKey::DuplicateCode => "This QR code is already linked to a mobile number.",
        MessageKey::DuplicateMobile => {
            "This mobile number is already linked to another QR code."
        }
        MessageKey::WriteFailed => "Could not save to sheet. Please try again.",
        MessageKey::VerifyAmbiguous => {
            "Registration might not have saved. Please refresh and check the sheet."
        }
        MessageKey::Busy => "A registration is already in progress.",
    }
}

fn tamil(key: MessageKey) -> Option<&'static str> {
    match key {
        MessageKey::Registered => Some("வாடிக்கையாளர் வெற்றிகரமாக பதிவு செய்யப்பட்டார்!"),
        MessageKey::ConfigMissing => Some("Script URL மற்றும் Sheet URL அமைக்கவும்."),
        MessageKey::InvalidSheetUrl => {
            Some("செல்லுபடியாகாத Google Sheet URL. முழு இணைப்பை ஒட்டவும் (gid உடன்).")
        }
        MessageKey::CodeNotFound => {
            Some("செல்லுபடியாகாத QR குறியீடு. ஷீட்டில் உள்ள சரியான QR குறியீட்டை உள்ளிடவும்.")
        }
        MessageKey::DuplicateCode => {
            Some("இந்த QR குறியீடு ஏற்கனவே ஒரு மொபைல் எண்ணுடன் இணைக்கப்பட்டுள்ளது.")
        }
        MessageKey::DuplicateMobile => {
            Some("இந்த மொபைல் எண் ஏற்கனவே வேறு QR குறியீட்டுடன் இணைக்கப்பட்டுள்ளது.")
        }
        MessageKey::WriteFailed => Some("ஷீட்டில் சேமிக்க முடியவில்லை. மீண்டும் முயற்சிக்கவும்."),
        _ => None,
    }
}
