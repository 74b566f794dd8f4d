use anchor_lang::error::Error;
use anchor_lang::prelude::*;

#[error_code]
pub enum RaffleError {
    #[msg("Participant already entered this round")]
    AlreadyEntered,

    #[msg("Participant not found in the current round")]
    NotFound,

    #[msg("No participants in the current round")]
    NoParticipants,

    #[msg("A draw is already in progress")]
    DrawInProgress,

    #[msg("Winner count must be at least 1")]
    InvalidWinnerCount,

    #[msg("Unauthorized: actor is not an operator of this room")]
    Unauthorized,

    #[msg("Draw history could not be written")]
    HistorySinkFailure,

    #[msg("Announcement could not be delivered")]
    PresentationFailure,

    #[msg("Membership in the required channel is needed to enter")]
    MembershipRequired,

    #[msg("Membership in the required channel could not be verified")]
    MembershipUnverified,

    #[msg("Scheduled time must be in the future")]
    ScheduleInPast,

    #[msg("Scheduled draw not found or already fired")]
    ScheduleNotFound,

    #[msg("Bonus chance must be between 0 and 1")]
    InvalidBonusChance,

    #[msg("Bonus minimum must not exceed bonus maximum")]
    InvalidBonusRange,

    #[msg("Display name is empty or too long")]
    InvalidDisplayName,

    #[msg("Prize label exceeds maximum length")]
    PrizeTooLong,

    #[msg("Invalid calculation")]
    InvalidCalculation,
}

/// Returns true when `err` carries the given raffle error code.
pub fn is_raffle_error(err: &Error, code: RaffleError) -> bool {
    match err {
        Error::AnchorError(anchor_error) => anchor_error.error_code_number == u32::from(code),
        _ => false,
    }
}
