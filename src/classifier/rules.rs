//! Demo keyword rule table.
//!
//! Non-authoritative content. Each category is gated by keyword groups; each
//! rule inside fires when every one of its groups has a hit, and a matching
//! boost swaps in a higher probability and a fuller description.

/// Satisfied when any keyword in the group occurs in the input.
pub type AnyOf = &'static [&'static str];

#[derive(Debug)]
pub struct Boost {
    pub requires: &'static [AnyOf],
    pub probability: f64,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct Rule {
    pub condition: &'static str,
    pub requires: &'static [AnyOf],
    pub probability: f64,
    pub description: &'static str,
    pub boost: Option<Boost>,
}

#[derive(Debug)]
pub struct Category {
    pub name: &'static str,
    pub gate: &'static [AnyOf],
    pub rules: &'static [Rule],
}

/// Returned when no category produces a candidate.
pub const FALLBACK: &[(&str, f64, &str)] = &[
    (
        "General Malaise",
        0.4,
        "A general feeling of discomfort, illness, or uneasiness whose exact cause is difficult to identify.",
    ),
    (
        "Stress-Related Condition",
        0.35,
        "Many physical symptoms can be caused or exacerbated by psychological stress.",
    ),
    (
        "Seasonal Allergies",
        0.3,
        "Allergic reactions to seasonal triggers like pollen, dust, or mold.",
    ),
];

const fn rule(
    condition: &'static str,
    requires: &'static [AnyOf],
    probability: f64,
    description: &'static str,
) -> Rule {
    Rule {
        condition,
        requires,
        probability,
        description,
        boost: None,
    }
}

const fn boosted(
    condition: &'static str,
    requires: &'static [AnyOf],
    probability: f64,
    description: &'static str,
    boost: Boost,
) -> Rule {
    Rule {
        condition,
        requires,
        probability,
        description,
        boost: Some(boost),
    }
}

pub const CATEGORIES: &[Category] = &[
    Category {
        name: "respiratory",
        gate: &[&["cough"]],
        rules: &[
            boosted(
                "Common Cold",
                &[],
                0.7,
                "A common cold is a viral infection of your upper respiratory tract — your nose and throat.",
                Boost {
                    requires: &[&["runny nose", "congestion", "sneezing"]],
                    probability: 0.85,
                    description: "A common cold is a viral infection of your upper respiratory tract. Symptoms typically include runny nose, congestion, cough, and sore throat.",
                },
            ),
            boosted(
                "Influenza (Flu)",
                &[&["fever", "temperature", "chills"]],
                0.6,
                "Influenza is a viral infection that attacks your respiratory system — your nose, throat and lungs.",
                Boost {
                    requires: &[&["body ache", "muscle", "fatigue"]],
                    probability: 0.8,
                    description: "Influenza is a viral infection that attacks your respiratory system with symptoms including fever, body aches, fatigue, and cough.",
                },
            ),
            boosted(
                "Bronchitis",
                &[&["chest pain", "chest tightness", "breath", "breathing"]],
                0.5,
                "Bronchitis is an inflammation of the lining of your bronchial tubes, which carry air to and from your lungs.",
                Boost {
                    requires: &[&["mucus", "phlegm", "productive"]],
                    probability: 0.75,
                    description: "Bronchitis is an inflammation of the bronchial tubes that carry air to your lungs, characterized by coughing with mucus, chest discomfort, and fatigue.",
                },
            ),
            boosted(
                "Pneumonia",
                &[
                    &["fever", "high temperature"],
                    &["breath", "breathing", "short of breath"],
                ],
                0.4,
                "Pneumonia is an infection that inflames the air sacs in one or both lungs.",
                Boost {
                    requires: &[&["chest pain", "rapid breathing"]],
                    probability: 0.7,
                    description: "Pneumonia is an infection that inflames the air sacs in one or both lungs, causing fever, chest pain, difficulty breathing, and cough with phlegm.",
                },
            ),
            rule(
                "COVID-19",
                &[
                    &["fever", "temperature"],
                    &["breath", "breathing", "taste", "smell"],
                ],
                0.65,
                "COVID-19 is a respiratory illness caused by the SARS-CoV-2 virus. Symptoms may include fever, cough, shortness of breath, fatigue, and loss of taste or smell.",
            ),
        ],
    },
    Category {
        name: "headache",
        gate: &[&["headache", "head pain", "head ache"]],
        rules: &[
            boosted(
                "Tension Headache",
                &[],
                0.65,
                "A tension headache is generally a diffuse, mild to moderate pain that's often described as feeling like a tight band around your head.",
                Boost {
                    requires: &[&["stress", "pressure", "tight"]],
                    probability: 0.8,
                    description: "A tension headache is generally a diffuse, mild to moderate pain often described as feeling like a tight band around your head, typically triggered by stress.",
                },
            ),
            boosted(
                "Migraine",
                &[],
                0.45,
                "Migraine headaches are often characterized by throbbing pain, sensitivity to light and sound, and sometimes nausea.",
                Boost {
                    requires: &[&["light", "sound", "nausea", "vomit", "aura"]],
                    probability: 0.75,
                    description: "Migraine is a neurological condition characterized by intense, debilitating headaches with symptoms like throbbing pain, sensitivity to light and sound, and sometimes nausea or vomiting.",
                },
            ),
            rule(
                "Sinusitis",
                &[&["sinus", "congestion", "nasal", "face pain"]],
                0.7,
                "Sinusitis is inflammation of the sinuses, often causing headaches, facial pain, nasal congestion, and sometimes fever.",
            ),
            rule(
                "Cluster Headache",
                &[&["severe"], &["one side", "eye pain", "around eye"]],
                0.6,
                "Cluster headaches are extremely painful headaches occurring in clusters or cyclical patterns, often around one eye or on one side of the head.",
            ),
            rule(
                "Meningitis",
                &[
                    &["fever", "temperature"],
                    &["stiff neck", "neck pain", "light sensitivity"],
                ],
                0.4,
                "Meningitis is inflammation of the membranes surrounding your brain and spinal cord. Seek immediate medical attention if you have severe headache with fever and stiff neck.",
            ),
        ],
    },
    Category {
        name: "gastrointestinal",
        gate: &[&["stomach", "abdominal", "belly", "nausea", "vomit", "diarrhea"]],
        rules: &[
            rule(
                "Gastritis",
                &[&["stomach", "abdominal"], &["pain", "ache", "burning"]],
                0.7,
                "Gastritis is inflammation of the stomach lining, causing abdominal pain, nausea, vomiting, and a feeling of fullness.",
            ),
            rule(
                "Gastroenteritis (Stomach Flu)",
                &[&["diarrhea", "loose stool"], &["nausea", "vomit"]],
                0.8,
                "Gastroenteritis is inflammation of the digestive tract, causing diarrhea, nausea, vomiting, and abdominal cramps, often due to a virus.",
            ),
            boosted(
                "Food Poisoning",
                &[&["nausea", "vomit"], &["diarrhea", "cramp"]],
                0.55,
                "Food poisoning is an illness caused by eating contaminated food.",
                Boost {
                    requires: &[&["food", "ate", "meal"]],
                    probability: 0.75,
                    description: "Food poisoning is an illness caused by eating contaminated food, resulting in nausea, vomiting, diarrhea, and abdominal cramps.",
                },
            ),
            rule(
                "Irritable Bowel Syndrome (IBS)",
                &[
                    &["abdominal", "stomach"],
                    &["pain", "cramp"],
                    &["diarrhea", "constipation", "bloating"],
                ],
                0.65,
                "IBS is a common disorder affecting the large intestine, causing abdominal pain, cramping, bloating, gas, diarrhea or constipation.",
            ),
            rule(
                "Appendicitis",
                &[
                    &["right"],
                    &["lower", "side"],
                    &["pain"],
                    &["severe", "intense"],
                ],
                0.5,
                "Appendicitis is inflammation of the appendix causing severe pain that begins around the navel and shifts to the lower right abdomen. Seek immediate medical attention.",
            ),
        ],
    },
    Category {
        name: "fever",
        gate: &[&["fever", "temperature", "hot", "chills"]],
        rules: &[
            rule(
                "Viral Infection",
                &[],
                0.7,
                "Fever is often a sign that your body is fighting a viral infection. Common viral infections include the common cold, flu, and COVID-19.",
            ),
            rule(
                "Urinary Tract Infection (UTI)",
                &[&["urinate", "pee", "urination", "burning", "bladder", "urine"]],
                0.75,
                "A UTI is an infection in any part of your urinary system, causing symptoms like burning during urination, frequent urination, cloudy urine, and sometimes fever.",
            ),
            rule(
                "Strep Throat",
                &[&["throat", "swallow"], &["sore", "pain"]],
                0.6,
                "Strep throat is a bacterial infection causing a sore, scratchy throat, fever, and swollen lymph nodes in the neck.",
            ),
            rule(
                "Malaria",
                &[
                    &["chills"],
                    &["sweat"],
                    &["travel", "tropical", "africa", "asia"],
                ],
                0.5,
                "Malaria is a serious disease caused by parasites transmitted through mosquito bites, causing cycles of fever, chills, and sweating.",
            ),
        ],
    },
    Category {
        name: "skin",
        gate: &[&["rash", "skin", "itch", "hives"]],
        rules: &[
            rule(
                "Allergic Reaction",
                &[],
                0.7,
                "An allergic reaction can cause symptoms like rash, hives, itching, and sometimes swelling, often in response to food, medication, or environmental triggers.",
            ),
            rule(
                "Eczema",
                &[&["dry", "patch", "itch"]],
                0.65,
                "Eczema (atopic dermatitis) is a condition that makes your skin red, itchy, and sometimes scaly or cracked.",
            ),
            rule(
                "Psoriasis",
                &[&["scale", "silver", "thick", "red patch"]],
                0.6,
                "Psoriasis is a skin disease that causes red, itchy, scaly patches, most commonly on the knees, elbows, trunk and scalp.",
            ),
        ],
    },
    Category {
        name: "musculoskeletal",
        gate: &[&["joint", "muscle", "arthritis", "pain", "ache", "sore"]],
        rules: &[
            rule(
                "Arthritis",
                &[&["joint"], &["pain", "swell", "stiff"]],
                0.7,
                "Arthritis involves inflammation of one or more joints, causing pain, stiffness, and sometimes swelling that worsens with age.",
            ),
            rule(
                "Fibromyalgia",
                &[
                    &["muscle", "body"],
                    &["pain", "ache"],
                    &["fatigue", "tired", "sleep"],
                ],
                0.6,
                "Fibromyalgia is a disorder characterized by widespread musculoskeletal pain accompanied by fatigue, sleep, memory and mood issues.",
            ),
            rule(
                "Muscle Strain",
                &[&["muscle"], &["strain", "pull", "injury", "exercise"]],
                0.8,
                "A muscle strain occurs when a muscle is overstretched or torn, causing pain, swelling, and limited movement in the affected area.",
            ),
        ],
    },
];

/// Every keyword referenced by the table, deduplicated, in first-seen order.
pub fn all_keywords() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    let mut push_groups = |groups: &'static [AnyOf]| {
        for group in groups {
            for &kw in group.iter() {
                if !out.contains(&kw) {
                    out.push(kw);
                }
            }
        }
    };
    for category in CATEGORIES {
        push_groups(category.gate);
        for rule in category.rules {
            push_groups(rule.requires);
            if let Some(boost) = &rule.boost {
                push_groups(boost.requires);
            }
        }
    }
    out
}
