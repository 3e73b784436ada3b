/// One selectable voice inside a synthesis model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    pub id: String,
    pub display_name: String,
}

impl Speaker {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Synthesis configuration for one language: which model serves it, at what
/// sample rate, and which speakers it ships. Speaker order matters: the
/// first entry is the fallback when a requested speaker is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    pub language: String,
    pub display_name: String,
    pub model_id: String,
    pub sample_rate: u32,
    pub speakers: Vec<Speaker>,
}

impl VoiceProfile {
    pub fn speaker(&self, id: &str) -> Option<&Speaker> {
        self.speakers.iter().find(|s| s.id == id)
    }

    pub fn first_speaker(&self) -> Option<&Speaker> {
        self.speakers.first()
    }
}

/// The fixed set of languages speech synthesis supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCatalog {
    profiles: Vec<VoiceProfile>,
}

impl VoiceCatalog {
    pub fn new(profiles: Vec<VoiceProfile>) -> Self {
        Self { profiles }
    }

    /// The Silero voice set the service ships with.
    pub fn silero_defaults() -> Self {
        Self::new(vec![
            VoiceProfile {
                language: "ru".to_string(),
                display_name: "Russian".to_string(),
                model_id: "v4_ru".to_string(),
                sample_rate: 48_000,
                speakers: vec![
                    Speaker::new("aidar", "Male (Aidar)"),
                    Speaker::new("baya", "Female (Baya)"),
                    Speaker::new("kseniya", "Female (Kseniya)"),
                    Speaker::new("xenia", "Female (Xenia)"),
                ],
            },
            VoiceProfile {
                language: "en".to_string(),
                display_name: "English".to_string(),
                model_id: "v3_en".to_string(),
                sample_rate: 48_000,
                speakers: vec![
                    Speaker::new("en_0", "Female (en_0)"),
                    Speaker::new("en_10", "Male (en_10)"),
                    Speaker::new("en_2", "Female (en_2)"),
                    Speaker::new("en_7", "Male (en_7)"),
                ],
            },
        ])
    }

    pub fn profile(&self, language: &str) -> Option<&VoiceProfile> {
        self.profiles.iter().find(|p| p.language == language)
    }

    pub fn supports(&self, language: &str) -> bool {
        self.profile(language).is_some()
    }

    pub fn profiles(&self) -> &[VoiceProfile] {
        &self.profiles
    }
}
