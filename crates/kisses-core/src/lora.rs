//! The style-preset catalog.
//!
//! Each preset names a FLUX LoRA hosted on Hugging Face together with the
//! generation parameters it was tuned for: trigger text that must decorate
//! every prompt, LoRA scale, diffusion steps, output dimensions, and an
//! optional instruction for the prompt-refinement model.

use crate::account::AccountId;

/// Default output width when a preset does not override it.
pub const DEFAULT_WIDTH: u32 = 1024;

/// Default output height when a preset does not override it.
pub const DEFAULT_HEIGHT: u32 = 768;

/// A prompt suggestion shown to users of a preset.
#[derive(Debug, Clone, Copy)]
pub struct Suggestion {
    /// Short label.
    pub label: &'static str,
    /// The suggested prompt text.
    pub prompt: &'static str,
}

/// A named image-generation style preset backed by a LoRA.
#[derive(Debug, Clone, Copy)]
pub struct Lora {
    /// Catalog id.
    pub id: u32,
    /// Display name.
    pub name: &'static str,
    /// The preset author (receives creator rewards).
    pub author: &'static str,
    /// Model slug, used as the wire identifier for generation requests.
    pub model: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Model card URL.
    pub url: &'static str,
    /// LoRA weights path passed to the image provider.
    pub path: &'static str,
    /// Trigger text prepended to the prompt (joined with `", "`).
    pub trigger_prefix: Option<&'static str>,
    /// Trigger text appended to the prompt (joined with a space).
    pub trigger_suffix: Option<&'static str>,
    /// LoRA scale.
    pub scale: f32,
    /// Diffusion steps.
    pub steps: u32,
    /// Instruction for the prompt-refinement model; `None` skips refinement.
    pub refinement: Option<&'static str>,
    /// Output width override.
    pub width: Option<u32>,
    /// Output height override.
    pub height: Option<u32>,
    /// Prompt suggestions.
    pub suggestions: &'static [Suggestion],
}

impl Lora {
    /// Decorate a prompt with this preset's trigger text.
    #[must_use]
    pub fn apply_trigger(&self, prompt: &str) -> String {
        let mut out = prompt.to_string();
        if let Some(prefix) = self.trigger_prefix {
            out = format!("{prefix}, {out}");
        }
        if let Some(suffix) = self.trigger_suffix {
            out = format!("{out} {suffix}");
        }
        out
    }

    /// Output width, falling back to the catalog default.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    /// Output height, falling back to the catalog default.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }

    /// The ledger account that accrues this preset's creator rewards.
    ///
    /// # Panics
    ///
    /// Never panics for catalog entries; author and model slugs are
    /// non-empty and authors contain no separator.
    #[must_use]
    pub fn reward_account(&self) -> AccountId {
        AccountId::creator_model(self.author, self.model)
            .unwrap_or_else(|e| unreachable!("catalog entry {}: {e}", self.model))
    }

    /// Look up a preset by its model slug.
    #[must_use]
    pub fn find(model: &str) -> Option<&'static Lora> {
        LORAS.iter().find(|l| l.model == model)
    }
}

/// The active preset catalog.
pub static LORAS: &[Lora] = &[
    Lora {
        id: 9,
        name: "Icons",
        author: "strangerzonehf",
        model: "Flux-Icon-Kit-LoRA",
        description: "Creates clean, scalable icon sets for UI/UX projects.",
        url: "https://huggingface.co/strangerzonehf/Flux-Icon-Kit-LoRA",
        path: "https://huggingface.co/strangerzonehf/Flux-Icon-Kit-LoRA",
        trigger_prefix: Some("Icon Kit"),
        trigger_suffix: None,
        scale: 1.0,
        steps: 33,
        refinement: Some(
            "Refine the prompt so that it describes an icon that can be used in UI/UX \
             projects. Do not ask for multiple icons.",
        ),
        width: Some(1280),
        height: Some(832),
        suggestions: &[
            Suggestion { label: "Red torch", prompt: "A flaming red torch" },
            Suggestion { label: "Brown briefcase", prompt: "A brown briefcase" },
            Suggestion { label: "Snow globe", prompt: "A snow globe" },
        ],
    },
    Lora {
        id: 6,
        name: "Logos",
        author: "Shakker-Labs",
        model: "FLUX.1-dev-LoRA-Logo-Design",
        description: "Tailored for professional and minimalist logo creation.",
        url: "https://huggingface.co/Shakker-Labs/FLUX.1-dev-LoRA-Logo-Design",
        path: "https://huggingface.co/Shakker-Labs/FLUX.1-dev-LoRA-Logo-Design",
        trigger_prefix: Some("logo, Minimalist"),
        trigger_suffix: None,
        scale: 0.8,
        steps: 28,
        refinement: Some(
            "Refine the prompt so that it describes a professional and minimalist logo. \
             If the prompt describes two items, then just return those two items.",
        ),
        width: None,
        height: None,
        suggestions: &[
            Suggestion { label: "Cat and flame", prompt: "cat and flame" },
            Suggestion { label: "Coffee and city", prompt: "a cup of coffee and a city skyline" },
            Suggestion { label: "Tree and water", prompt: "A tree and a lake" },
        ],
    },
    Lora {
        id: 7,
        name: "Realism",
        author: "strangerzonehf",
        model: "Flux-Midjourney-Mix2-LoRA",
        description: "Mimics MidJourney's style, blending intricate and artistic designs.",
        url: "https://huggingface.co/strangerzonehf/Flux-Midjourney-Mix2-LoRA",
        path: "https://huggingface.co/strangerzonehf/Flux-Midjourney-Mix2-LoRA",
        trigger_prefix: Some("MJ v6"),
        trigger_suffix: None,
        scale: 1.0,
        steps: 28,
        refinement: Some(
            "Refine that prompt so it mimics MidJourney's style, blending intricate and \
             artistic designs. Edit for photorealism and close-up shots.",
        ),
        width: None,
        height: None,
        suggestions: &[
            Suggestion {
                label: "Banana bread",
                prompt: "banana bread with chocolate chips and pecans",
            },
            Suggestion { label: "Gemstone", prompt: "A gemstone under soft lighting" },
            Suggestion {
                label: "Paint palette",
                prompt: "An artist's paint palette smeared with vibrant colors",
            },
        ],
    },
    Lora {
        id: 10,
        name: "Tarot Card",
        author: "multimodalart",
        model: "flux-tarot-v1",
        description: "Produces artistic, mystical tarot card designs.",
        url: "https://huggingface.co/multimodalart/flux-tarot-v1",
        path: "https://huggingface.co/multimodalart/flux-tarot-v1",
        trigger_prefix: None,
        trigger_suffix: Some("in the style of TOK a trtcrd tarot style"),
        scale: 1.0,
        steps: 28,
        refinement: None,
        width: None,
        height: None,
        suggestions: &[
            Suggestion { label: "Wheel of fortune", prompt: "the wheel of fortune" },
            Suggestion { label: "Kangaroo", prompt: "a kangaroo" },
            Suggestion { label: "Moon", prompt: "the moon" },
        ],
    },
    Lora {
        id: 3,
        name: "Vector Sketch",
        author: "mujibanget",
        model: "vector-illustration",
        description: "Generates smooth, scalable vector-style sketches ideal for digital designs.",
        url: "https://huggingface.co/mujibanget/vector-illustration",
        path: "https://huggingface.co/mujibanget/vector-illustration",
        trigger_prefix: None,
        trigger_suffix: Some(
            "vector illustration with mujibvector style, isolated in a white background",
        ),
        scale: 1.0,
        steps: 28,
        refinement: None,
        width: None,
        height: None,
        suggestions: &[
            Suggestion { label: "Dog", prompt: "cute dog" },
            Suggestion { label: "Flower", prompt: "a rose" },
            Suggestion { label: "Lamp", prompt: "a vintage lamp" },
        ],
    },
    Lora {
        id: 1,
        name: "Colored Sketch",
        author: "strangerzonehf",
        model: "Flux-Sketch-Ep-LoRA",
        description: "Creates vibrant, colorful sketch-style illustrations.",
        url: "https://huggingface.co/strangerzonehf/Flux-Sketch-Ep-LoRA",
        path: "https://huggingface.co/strangerzonehf/Flux-Sketch-Ep-LoRA",
        trigger_prefix: Some("ep sketch"),
        trigger_suffix: None,
        scale: 1.0,
        steps: 33,
        refinement: Some(
            "Refine the prompt so that it describes a vibrant, colorful, sketch illustration.",
        ),
        width: Some(1280),
        height: Some(832),
        suggestions: &[
            Suggestion { label: "Albert Einstein", prompt: "Albert Einstein" },
            Suggestion { label: "New York City", prompt: "New York City" },
            Suggestion { label: "Space", prompt: "Space adventure" },
        ],
    },
    Lora {
        id: 4,
        name: "Pencil Sketch",
        author: "Datou1111",
        model: "shou_xin",
        description: "Adds a realistic pencil-drawn effect to your designs.",
        url: "https://huggingface.co/Datou1111/shou_xin",
        // The weights live under a different namespace than the model card.
        path: "https://huggingface.co/hassanelmghari/shou_xin",
        trigger_prefix: Some("shou_xin, pencil sketch"),
        trigger_suffix: None,
        scale: 1.0,
        steps: 28,
        refinement: None,
        width: None,
        height: None,
        suggestions: &[
            Suggestion { label: "Cat", prompt: "a cat with blue eyes" },
            Suggestion { label: "Steve Jobs", prompt: "steve jobs" },
            Suggestion { label: "Books", prompt: "A stack of books" },
        ],
    },
    Lora {
        id: 5,
        name: "Anime Sketch",
        author: "glif",
        model: "anime-blockprint-style",
        description: "Combines anime-inspired designs with textured block print aesthetics.",
        url: "https://huggingface.co/glif/anime-blockprint-style",
        path: "https://huggingface.co/glif/anime-blockprint-style",
        trigger_prefix: None,
        trigger_suffix: Some("blockprint style"),
        scale: 1.0,
        steps: 28,
        refinement: Some(
            "Refine the prompt so that it combines anime inspired designs with textured \
             block print aesthetics. The refinement should only include a description that \
             would exist in both anime and block print.",
        ),
        width: None,
        height: None,
        suggestions: &[
            Suggestion { label: "Young man", prompt: "a young man with glasses" },
            Suggestion { label: "Paper cranes", prompt: "a flock of paper cranes" },
            Suggestion { label: "Flower", prompt: "a flower blooming" },
        ],
    },
];
