//! Profile display and editing.

use super::{CliError, CliResult, Session};
use crate::{ProfileAction, ProfileSetArgs};
use braindump_core::{NudgeFrequency, Palette, PreferencesPatch, ProfilePatch, UserProfile};

pub fn run(session: &mut Session, action: ProfileAction) -> CliResult {
    match action {
        ProfileAction::Show => print_profile(session.context.profile().profile()),
        ProfileAction::Set(args) => {
            let patch = build_patch(args)?;
            if patch.is_empty() {
                return Err(CliError::Usage("nothing to update".to_string()));
            }
            let profile = session.context.profile_mut().update(&patch);
            print_profile(profile);
        }
    }
    Ok(())
}

fn build_patch(args: ProfileSetArgs) -> CliResult<ProfilePatch> {
    let palette = args
        .palette
        .as_deref()
        .map(|value| {
            Palette::parse(value).ok_or_else(|| CliError::Usage(format!("invalid palette `{value}`")))
        })
        .transpose()?;
    let nudge_frequency = args
        .nudge_frequency
        .as_deref()
        .map(|value| {
            NudgeFrequency::parse(value)
                .ok_or_else(|| CliError::Usage(format!("invalid nudge frequency `{value}`")))
        })
        .transpose()?;

    Ok(ProfilePatch {
        name: args.name,
        avatar: args.avatar,
        preferences: Some(PreferencesPatch {
            palette,
            notifications_enabled: args.notifications,
            nudge_frequency,
            ai_context: args.ai_context,
        }),
        ..ProfilePatch::default()
    })
}

fn print_profile(profile: &UserProfile) {
    let preferences = &profile.preferences;
    println!("{}", profile.name);
    if !profile.avatar.is_empty() {
        println!("  avatar:        {}", profile.avatar);
    }
    println!("  streak:        {} days", profile.streak);
    println!("  total wins:    {}", profile.total_wins);
    println!("  palette:       {}", preferences.palette);
    println!(
        "  notifications: {}",
        if preferences.notifications_enabled { "on" } else { "off" }
    );
    println!("  nudges:        {}", preferences.nudge_frequency);
    println!(
        "  ai context:    {}",
        preferences.context().unwrap_or("(none)")
    );
}

#[cfg(test)]
mod tests {
    use super::build_patch;
    use crate::ProfileSetArgs;
    use braindump_core::Palette;

    #[test]
    fn build_patch_parses_preferences() {
        let patch = build_patch(ProfileSetArgs {
            palette: Some("Midnight".to_string()),
            ..ProfileSetArgs::default()
        })
        .unwrap();
        assert_eq!(
            patch.preferences.and_then(|preferences| preferences.palette),
            Some(Palette::Midnight)
        );
    }

    #[test]
    fn build_patch_rejects_unknown_values() {
        let err = build_patch(ProfileSetArgs {
            nudge_frequency: Some("hourly".to_string()),
            ..ProfileSetArgs::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("hourly"));

        assert!(build_patch(ProfileSetArgs::default()).unwrap().is_empty());
    }
}
