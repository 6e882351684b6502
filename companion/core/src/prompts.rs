//! Prompt templates
//!
//! Everything the companion is told about itself is derived from the
//! [`CharacterProfile`] here: the avatar portrait prompt, the persona system
//! instruction, and the internal request that opens a conversation.

use crate::profile::CharacterProfile;

/// Name used in the portrait prompt when the user has not named the companion
const UNNAMED: &str = "character";

/// Behavioral rules appended to every persona instruction
const PERSONA_RULES: &str = "Act exactly like this persona.
If you are a girlfriend/boyfriend, be affectionate, caring, and romantic.
If you are a friend, be supportive and casual.
Do not break character.
Keep responses concise (1-3 sentences) unless asked for more deep conversation.
Use emojis occasionally if it fits the personality.
The user is your partner/friend.";

/// Build the portrait prompt for avatar generation
#[must_use]
pub fn avatar_prompt(profile: &CharacterProfile) -> String {
    let name = if profile.name.is_empty() {
        UNNAMED
    } else {
        profile.name.as_str()
    };

    format!(
        "A high quality, photorealistic portrait of a {age} year old person named {name}. \
         {hair_color} hair, {hair_style} style, {skin} skin, {body} body. \
         {personality} vibe. Soft lighting, 8k resolution, detailed face.",
        age = profile.age,
        hair_color = profile.hair_color,
        hair_style = profile.hair_style,
        skin = profile.skin_tone,
        body = profile.body_type,
        personality = profile.personality,
    )
}

/// Build the system instruction that fixes the companion's persona for a session
#[must_use]
pub fn persona_instruction(profile: &CharacterProfile) -> String {
    format!(
        "You are {name}, a {age}-year-old.\n\
         You are the user's {relationship}.\n\
         Your personality is: {personality}.\n\
         Your appearance is: {hair_color} hair, {hair_style} style, {skin} skin, {body} body type.\n\
         \n\
         {rules}",
        name = profile.name,
        age = profile.age,
        relationship = profile.relationship,
        personality = profile.personality,
        hair_color = profile.hair_color,
        hair_style = profile.hair_style,
        skin = profile.skin_tone,
        body = profile.body_type,
        rules = PERSONA_RULES,
    )
}

/// Build the internal first turn that asks the companion to open the conversation
#[must_use]
pub fn greeting_request(profile: &CharacterProfile) -> String {
    format!(
        "(Internal: Start the conversation as {name}, greeting me warmly based on our relationship as {relationship}.)",
        name = profile.name,
        relationship = profile.relationship,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Age, HairColor, ProfileEdit, Relationship};
    use pretty_assertions::assert_eq;

    fn luna() -> CharacterProfile {
        CharacterProfile {
            name: "Luna".to_string(),
            personality: "Playful & Witty".to_string(),
            ..CharacterProfile::default()
        }
    }

    #[test]
    fn test_avatar_prompt() {
        assert_eq!(
            avatar_prompt(&luna()),
            "A high quality, photorealistic portrait of a 24 year old person named Luna. \
             Brown hair, Long Wavy style, Fair skin, Slim body. \
             Playful & Witty vibe. Soft lighting, 8k resolution, detailed face."
        );
    }

    #[test]
    fn test_avatar_prompt_unnamed() {
        let prompt = avatar_prompt(&CharacterProfile::new());
        assert!(prompt.contains("person named character."));
    }

    #[test]
    fn test_avatar_prompt_tracks_edits() {
        let profile = luna()
            .with_edit(ProfileEdit::Age(Age::new(31)))
            .with_edit(ProfileEdit::HairColor(HairColor::Silver));
        let prompt = avatar_prompt(&profile);
        assert!(prompt.contains("31 year old"));
        assert!(prompt.contains("Silver hair"));
    }

    #[test]
    fn test_persona_instruction() {
        let profile = luna().with_edit(ProfileEdit::Relationship(Relationship::BestFriend));
        let persona = persona_instruction(&profile);

        assert!(persona.starts_with("You are Luna, a 24-year-old.\n"));
        assert!(persona.contains("You are the user's Best Friend.\n"));
        assert!(persona.contains("Your personality is: Playful & Witty.\n"));
        assert!(persona.contains(
            "Your appearance is: Brown hair, Long Wavy style, Fair skin, Slim body type."
        ));
        assert!(persona.ends_with("The user is your partner/friend."));
    }

    #[test]
    fn test_greeting_request() {
        assert_eq!(
            greeting_request(&luna()),
            "(Internal: Start the conversation as Luna, greeting me warmly based on our relationship as Girlfriend.)"
        );
    }
}
