//! Character Profile
//!
//! The one durable record of the application: everything the user designs on
//! the creation screen. It lives in the [`Studio`](crate::Studio) for the
//! whole process and is handed to every screen by reference.
//!
//! Every field except the avatar always holds a valid value of its domain.
//! Enumerated appearance fields are real enums, the age is clamped at
//! construction, and free-text fields are plain strings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The six built-in personality presets
pub const PERSONALITY_PRESETS: [&str; 6] = [
    "Playful & Witty",
    "Shy & Sweet",
    "Bold & Adventurous",
    "Intellectual & Calm",
    "Gothic & Mysterious",
    "Energetic & Cheerful",
];

/// Declares a closed set of labelled choices with cycling helpers.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = $label]
                $variant,
            )+
        }

        impl $name {
            /// All choices in display order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Human-readable label
            #[must_use]
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Position of this choice in [`Self::ALL`]
            #[must_use]
            pub fn index(self) -> usize {
                Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
            }

            /// Next choice, wrapping around
            #[must_use]
            pub fn next(self) -> Self {
                Self::ALL[(self.index() + 1) % Self::ALL.len()]
            }

            /// Previous choice, wrapping around
            #[must_use]
            pub fn prev(self) -> Self {
                let len = Self::ALL.len();
                Self::ALL[(self.index() + len - 1) % len]
            }

            /// Look a choice up by its label (case-insensitive)
            #[must_use]
            pub fn from_label(label: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_enum! {
    /// Hair color choices
    HairColor, default = Brown {
        Black => "Black",
        Brown => "Brown",
        Blonde => "Blonde",
        Red => "Red",
        Auburn => "Auburn",
        Silver => "Silver",
        White => "White",
        Pink => "Pink",
        Blue => "Blue",
        Purple => "Purple",
        Green => "Green",
    }
}

choice_enum! {
    /// Hair style choices
    HairStyle, default = LongWavy {
        LongStraight => "Long Straight",
        LongWavy => "Long Wavy",
        ShortBob => "Short Bob",
        PixieCut => "Pixie Cut",
        Ponytail => "Ponytail",
        MessyBun => "Messy Bun",
        Braids => "Braids",
        ShoulderLength => "Shoulder Length",
        Bald => "Bald",
        BuzzCut => "Buzz Cut",
    }
}

choice_enum! {
    /// Skin tone choices
    SkinTone, default = Fair {
        Pale => "Pale",
        Fair => "Fair",
        Light => "Light",
        Medium => "Medium",
        Tan => "Tan",
        Olive => "Olive",
        Brown => "Brown",
        Dark => "Dark",
        Ebony => "Ebony",
    }
}

choice_enum! {
    /// Body type choices
    BodyType, default = Slim {
        Slim => "Slim",
        Athletic => "Athletic",
        Curvy => "Curvy",
        Muscular => "Muscular",
        Average => "Average",
        Petite => "Petite",
        Tall => "Tall",
        PlusSize => "Plus Size",
    }
}

choice_enum! {
    /// The role the companion plays for the user
    Relationship, default = Girlfriend {
        Girlfriend => "Girlfriend",
        Boyfriend => "Boyfriend",
        BestFriend => "Best Friend",
        Mentor => "Mentor",
        Partner => "Partner",
    }
}

/// Companion age in years, always within [`Age::MIN`]..=[`Age::MAX`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Age(u8);

impl Age {
    /// Youngest allowed age
    pub const MIN: u8 = 18;
    /// Oldest allowed age
    pub const MAX: u8 = 65;

    /// Create an age, clamping into the allowed range
    #[must_use]
    pub fn new(years: u8) -> Self {
        Self(years.clamp(Self::MIN, Self::MAX))
    }

    /// Age in years
    #[must_use]
    pub fn years(self) -> u8 {
        self.0
    }

    /// Step by `delta` years, saturating at the bounds
    #[must_use]
    pub fn step(self, delta: i16) -> Self {
        let years = (i16::from(self.0) + delta).clamp(i16::from(Self::MIN), i16::from(Self::MAX));
        Self::new(u8::try_from(years).unwrap_or(Self::MIN))
    }
}

impl Default for Age {
    fn default() -> Self {
        Self(24)
    }
}

impl From<u8> for Age {
    fn from(years: u8) -> Self {
        Self::new(years)
    }
}

impl From<Age> for u8 {
    fn from(age: Age) -> Self {
        age.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A generated avatar image, kept as the base64 payload the API returned
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarImage {
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl AvatarImage {
    /// Create an avatar image from an inline payload
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// The image as a `data:` URI
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Approximate decoded size in bytes
    #[must_use]
    pub fn approx_size(&self) -> usize {
        let padding = self.data.chars().rev().take_while(|c| *c == '=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

/// The companion being designed
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    /// Display name (required before chatting)
    pub name: String,
    /// Age in years
    pub age: Age,
    /// Preset or free-text personality (required before chatting)
    pub personality: String,
    /// Hair color
    pub hair_color: HairColor,
    /// Hair style
    pub hair_style: HairStyle,
    /// Skin tone
    pub skin_tone: SkinTone,
    /// Body type
    pub body_type: BodyType,
    /// Relationship role
    pub relationship: Relationship,
    /// Generated avatar, if any
    pub avatar: Option<AvatarImage>,
}

impl CharacterProfile {
    /// Create a profile with the default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the profile may progress to the chat screen
    ///
    /// Recomputed on every call; only `name` and `personality` gate.
    #[must_use]
    pub fn can_finish(&self) -> bool {
        !self.name.is_empty() && !self.personality.is_empty()
    }

    /// Produce a new profile with a single field edited
    ///
    /// The avatar is never touched by an edit.
    #[must_use]
    pub fn with_edit(&self, edit: ProfileEdit) -> Self {
        let mut next = self.clone();
        match edit {
            ProfileEdit::Name(name) => next.name = name,
            ProfileEdit::Age(age) => next.age = age,
            ProfileEdit::Personality(personality) => next.personality = personality,
            ProfileEdit::HairColor(color) => next.hair_color = color,
            ProfileEdit::HairStyle(style) => next.hair_style = style,
            ProfileEdit::SkinTone(tone) => next.skin_tone = tone,
            ProfileEdit::BodyType(body) => next.body_type = body,
            ProfileEdit::Relationship(role) => next.relationship = role,
        }
        next
    }

    /// Produce a new profile whose avatar is replaced
    #[must_use]
    pub fn with_avatar(&self, avatar: AvatarImage) -> Self {
        Self {
            avatar: Some(avatar),
            ..self.clone()
        }
    }

    /// Placeholder glyph for when no avatar has been generated
    ///
    /// Falls back to `?` for a blank name.
    #[must_use]
    pub fn initial(&self) -> String {
        self.name
            .trim()
            .chars()
            .next()
            .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
    }

    /// Whether the current personality is one of the presets
    #[must_use]
    pub fn preset_index(&self) -> Option<usize> {
        PERSONALITY_PRESETS
            .iter()
            .position(|p| *p == self.personality)
    }
}

/// A single-field edit of the profile
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileEdit {
    /// Replace the name
    Name(String),
    /// Replace the age
    Age(Age),
    /// Replace the personality
    Personality(String),
    /// Replace the hair color
    HairColor(HairColor),
    /// Replace the hair style
    HairStyle(HairStyle),
    /// Replace the skin tone
    SkinTone(SkinTone),
    /// Replace the body type
    BodyType(BodyType),
    /// Replace the relationship role
    Relationship(Relationship),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn luna() -> CharacterProfile {
        CharacterProfile {
            name: "Luna".to_string(),
            personality: "Playful & Witty".to_string(),
            ..CharacterProfile::default()
        }
    }

    fn every_edit() -> Vec<ProfileEdit> {
        vec![
            ProfileEdit::Name("Nova".to_string()),
            ProfileEdit::Age(Age::new(40)),
            ProfileEdit::Personality("Shy & Sweet".to_string()),
            ProfileEdit::HairColor(HairColor::Silver),
            ProfileEdit::HairStyle(HairStyle::Braids),
            ProfileEdit::SkinTone(SkinTone::Olive),
            ProfileEdit::BodyType(BodyType::Athletic),
            ProfileEdit::Relationship(Relationship::Mentor),
        ]
    }

    #[test]
    fn test_defaults() {
        let profile = CharacterProfile::new();
        assert_eq!(profile.name, "");
        assert_eq!(profile.age.years(), 24);
        assert_eq!(profile.personality, "");
        assert_eq!(profile.hair_color, HairColor::Brown);
        assert_eq!(profile.hair_style, HairStyle::LongWavy);
        assert_eq!(profile.skin_tone, SkinTone::Fair);
        assert_eq!(profile.body_type, BodyType::Slim);
        assert_eq!(profile.relationship, Relationship::Girlfriend);
        assert!(profile.avatar.is_none());
    }

    #[test]
    fn test_edit_touches_only_its_field() {
        let base = luna().with_avatar(AvatarImage::new("image/png", "AAAA"));

        for edit in every_edit() {
            let edited = base.with_edit(edit.clone());
            // Restore the edited field from the base; everything must match again
            let mut restored = edited.clone();
            match edit {
                ProfileEdit::Name(_) => restored.name = base.name.clone(),
                ProfileEdit::Age(_) => restored.age = base.age,
                ProfileEdit::Personality(_) => restored.personality = base.personality.clone(),
                ProfileEdit::HairColor(_) => restored.hair_color = base.hair_color,
                ProfileEdit::HairStyle(_) => restored.hair_style = base.hair_style,
                ProfileEdit::SkinTone(_) => restored.skin_tone = base.skin_tone,
                ProfileEdit::BodyType(_) => restored.body_type = base.body_type,
                ProfileEdit::Relationship(_) => restored.relationship = base.relationship,
            }
            assert_ne!(edited, base);
            assert_eq!(restored, base);
            assert_eq!(edited.avatar, base.avatar);
        }
    }

    #[test]
    fn test_can_finish_gating() {
        let mut profile = CharacterProfile::new();
        assert!(!profile.can_finish());

        profile = profile.with_edit(ProfileEdit::Name("Luna".to_string()));
        assert!(!profile.can_finish());

        profile = profile.with_edit(ProfileEdit::Personality("Calm".to_string()));
        assert!(profile.can_finish());

        profile = profile.with_edit(ProfileEdit::Name(String::new()));
        assert!(!profile.can_finish());
    }

    #[test]
    fn test_can_finish_ignores_other_fields() {
        for color in HairColor::ALL {
            for role in Relationship::ALL {
                let complete = luna()
                    .with_edit(ProfileEdit::HairColor(*color))
                    .with_edit(ProfileEdit::Relationship(*role));
                assert!(complete.can_finish());

                let nameless = complete.with_edit(ProfileEdit::Name(String::new()));
                assert!(!nameless.can_finish());
            }
        }
    }

    #[test]
    fn test_age_clamps() {
        assert_eq!(Age::new(5).years(), Age::MIN);
        assert_eq!(Age::new(99).years(), Age::MAX);
        assert_eq!(Age::new(30).years(), 30);
        assert_eq!(Age::new(64).step(5).years(), Age::MAX);
        assert_eq!(Age::new(19).step(-5).years(), Age::MIN);
        assert_eq!(Age::default().step(1).years(), 25);
    }

    #[test]
    fn test_age_deserialize_clamps() {
        let age: Age = serde_json::from_str("12").unwrap();
        assert_eq!(age.years(), 18);
    }

    #[test]
    fn test_choice_cycling_wraps() {
        assert_eq!(HairColor::Green.next(), HairColor::Black);
        assert_eq!(HairColor::Black.prev(), HairColor::Green);
        assert_eq!(BodyType::PlusSize.next(), BodyType::Slim);
        assert_eq!(Relationship::Girlfriend.next(), Relationship::Boyfriend);
    }

    #[test]
    fn test_choice_labels() {
        assert_eq!(HairStyle::ShoulderLength.label(), "Shoulder Length");
        assert_eq!(Relationship::BestFriend.to_string(), "Best Friend");
        assert_eq!(BodyType::from_label("plus size"), Some(BodyType::PlusSize));
        assert_eq!(SkinTone::from_label("Chartreuse"), None);
        assert_eq!(HairColor::ALL.len(), 11);
        assert_eq!(HairStyle::ALL.len(), 10);
        assert_eq!(SkinTone::ALL.len(), 9);
        assert_eq!(BodyType::ALL.len(), 8);
    }

    #[test]
    fn test_avatar_data_uri() {
        let avatar = AvatarImage::new("image/png", "iVBORw0KGgo=");
        assert_eq!(avatar.data_uri(), "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(avatar.approx_size(), 8);
    }

    #[test]
    fn test_initial() {
        assert_eq!(luna().initial(), "L");
        let lower = luna().with_edit(ProfileEdit::Name("ada".to_string()));
        assert_eq!(lower.initial(), "A");
        assert_eq!(CharacterProfile::new().initial(), "?");
    }

    #[test]
    fn test_preset_index() {
        assert_eq!(luna().preset_index(), Some(0));
        let custom = luna().with_edit(ProfileEdit::Personality("Sarcastic".to_string()));
        assert_eq!(custom.preset_index(), None);
    }
}
