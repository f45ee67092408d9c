use crate::error::KaygiError;
use crate::model::PredictionCategory;
use serde::Serialize;

/// How the headline should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
    Error,
}

/// A titled group of recommendation bullets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub items: Vec<&'static str>,
}

/// What to tell the user about a predicted category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guidance {
    pub category: PredictionCategory,
    pub tone: Tone,
    pub headline: &'static str,
    pub explanation: &'static str,
    pub sections: Vec<Section>,
}

impl Guidance {
    /// All bullets across sections, in display order.
    pub fn recommendations(&self) -> Vec<&'static str> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter().copied())
            .collect()
    }
}

pub fn resolve(category: PredictionCategory) -> Guidance {
    match category {
        PredictionCategory::Low => Guidance {
            category,
            tone: Tone::Success,
            headline: "Düşük Anksiyete",
            explanation: "Bu düzey, günlük yaşantınızı sürdürmenize engel olmayan bir anksiyete seviyesi olarak kabul edilir.",
            sections: vec![Section {
                title: "Öneriler",
                items: vec![
                    "Mevcut rutininizi koruyun.",
                    "Uyku, egzersiz ve beslenme alışkanlıklarınızı dengede tutun.",
                    "Gereksiz stres kaynaklarını tanımlayıp azaltın.",
                ],
            }],
        },
        PredictionCategory::Medium => Guidance {
            category,
            tone: Tone::Warning,
            headline: "Orta Anksiyete",
            explanation: "Bu düzeyde anksiyete bazı günlerde hayat kalitesini etkileyebilir.",
            sections: vec![
                Section {
                    title: "Kısa Vadeli Öneriler",
                    items: vec![
                        "Günde 10 dakika nefes egzersizi yapmayı deneyin.",
                        "Günlük kafein alımını 200 mg altına indirin.",
                        "Akşam 22:00 sonrası ekran süresini azaltın.",
                    ],
                },
                Section {
                    title: "Uzun Vadeli Öneriler",
                    items: vec![
                        "1 haftalık duygu takibi yapın.",
                        "Bir danışmanla ön görüşme planlayın.",
                    ],
                },
            ],
        },
        PredictionCategory::High => Guidance {
            category,
            tone: Tone::Error,
            headline: "Yüksek Anksiyete",
            explanation: "Bu düzeyde anksiyete günlük yaşamınızı ciddi şekilde etkileyebilir.",
            sections: vec![
                Section {
                    title: "Önemli Adımlar",
                    items: vec![
                        "Psikolojik destek almayı düşünün.",
                        "Günde en az 30 dakika yürüyüş yapın.",
                        "Kafein, alkol ve nikotin tüketimini sınırlayın.",
                    ],
                },
                Section {
                    title: "Faydalı Uygulamalar",
                    items: vec![
                        "Headspace (meditasyon)",
                        "Mindshift CBT (anksiyete takibi)",
                    ],
                },
            ],
        },
    }
}

/// Resolve a raw class index, rejecting values outside the known categories.
pub fn resolve_index(index: i64) -> Result<Guidance, KaygiError> {
    PredictionCategory::from_index(index).map(resolve)
}
