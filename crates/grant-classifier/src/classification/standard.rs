use super::config::{
    Adjustment, Band, CategoryRules, CodeRule, CodeTables, Condition, CoreRules, DecisionPolicy,
    EvidenceRules, EvidenceWeights, KeywordWeights, OrgIndicators, OverrideRule, PhraseGate,
    ReviewPolicy, RuleSet, ScoreTest,
};
use crate::taxonomy::Category;

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

const SMALL_BUSINESS_CODES: &[&str] = &["R41", "R42", "R43", "R44", "SB1", "U44"];

const DRUG_TERMS: &[&str] = &[
    "drug",
    "medication",
    "pharmacotherapy",
    "pharmacological",
    "pharmaceutical",
    "varenicline",
    "bupropion",
    "naltrexone",
    "buprenorphine",
    "methadone",
    "nicotine replacement",
    "compound",
    "inhibitor",
    "vaccine",
];

const BEHAVIORAL_TERMS: &[&str] = &[
    "behavioral intervention",
    "behavioral therapy",
    "cognitive behavioral",
    "mindfulness",
    "motivational interviewing",
    "psychotherapy",
    "counseling intervention",
    "lifestyle intervention",
    "peer support",
    "contingency management",
];

impl RuleSet {
    /// Built-in rule set used when no rules file is configured.
    pub fn standard() -> Self {
        Self {
            codes: standard_codes(),
            min_abstract_chars: 50,
            organizations: standard_organizations(),
            weights: KeywordWeights {
                strong: 3,
                moderate: 1,
                title_term: 4,
                title_multiplier: 3,
            },
            categories: vec![
                basic_research(),
                therapeutics(),
                biotools(),
                diagnostics(),
                medical_device(),
                digital_health(),
                other(),
            ],
            overrides: standard_overrides(),
            decision: DecisionPolicy {
                margin_bands: vec![
                    Band { min: 10, confidence: 90 },
                    Band { min: 6, confidence: 85 },
                    Band { min: 2, confidence: 80 },
                    Band { min: 1, confidence: 75 },
                ],
                base_confidence: 70,
                magnitude_bands: vec![
                    Band { min: 20, confidence: 90 },
                    Band { min: 12, confidence: 85 },
                    Band { min: 5, confidence: 80 },
                ],
                secondary_min_score: 3,
                secondary_ratio_pct: 40,
                fallback_confidence: 60,
                fallback_study_terms: list(&[
                    "study",
                    "investigate",
                    "examine",
                    "determine",
                    "characterize",
                    "understand",
                    "identify",
                    "hypothes",
                    "aim",
                ]),
            },
            review: ReviewPolicy {
                min_confidence: 90,
                min_margin: 30,
                min_score: 60,
            },
            evidence: standard_evidence(),
        }
    }
}

fn standard_codes() -> CodeTables {
    CodeTables {
        training: list(&[
            "T32", "T34", "T35", "T90", "TL1", "TL4", "F30", "F31", "F32", "F33", "F99", "K01",
            "K02", "K05", "K07", "K08", "K12", "K22", "K23", "K24", "K25", "K26", "K43", "K76",
            "K99", "KL2", "D43", "D71", "R25", "R90",
        ]),
        infrastructure: list(&[
            "P30", "P50", "P51", "S10", "G20", "U13", "R13", "U24", "U2C", "UL1",
        ]),
        multi_component: list(&[
            "P01", "P20", "P2C", "P60", "U19", "U54", "UG4", "U42", "UC7",
        ]),
        small_business: list(SMALL_BUSINESS_CODES),
        deterministic_confidence: 95,
        cores: CoreRules {
            training_phrases: list(&[
                "mentoring core",
                "mentorship core",
                "career development core",
                "training core",
                "education core",
                "investigator development core",
                "research education component",
            ]),
            infrastructure_phrases: list(&[
                "administrative core",
                "admin core",
                "core facility",
                "shared resource",
                "biostatistics core",
                "data management core",
                "data core",
                "imaging core",
                "genomics core",
                "proteomics core",
                "animal core",
                "clinical core",
                "pilot project program",
                "pilot and feasibility",
                "community engagement core",
                "dissemination core",
                "resource core",
            ]),
            title_patterns: list(&[r"\bcore$", r"^core\s*[a-z0-9]?\s*[:;\-]"]),
            training_confidence: 85,
            infrastructure_confidence: 82,
        },
        special: vec![
            CodeRule {
                name: "worker_training_program".to_string(),
                when: Condition {
                    activity_codes: list(&["U45", "UH4"]),
                    ..Condition::default()
                },
                category: Category::Training,
                confidence: 85,
            },
            CodeRule {
                name: "food_safety_regulatory_program".to_string(),
                when: Condition {
                    activity_codes: list(&["U2F"]),
                    ..Condition::default()
                },
                category: Category::Other,
                confidence: 85,
            },
            CodeRule {
                name: "biosafety_laboratory".to_string(),
                when: Condition {
                    activity_codes: list(&["UC7"]),
                    ..Condition::default()
                },
                category: Category::Infrastructure,
                confidence: 85,
            },
            CodeRule {
                name: "clinical_network_site".to_string(),
                when: Condition {
                    activity_codes: list(&["UG1", "U10"]),
                    any_of: vec![list(&[
                        "network",
                        "coordinating center",
                        "cooperative group",
                        "clinical site",
                        "consortium",
                        "investigator group",
                    ])],
                    ..Condition::default()
                },
                category: Category::Infrastructure,
                confidence: 80,
            },
            CodeRule {
                name: "cancer_registry".to_string(),
                when: Condition {
                    any_of: vec![list(&[
                        "seer program",
                        "seer registry",
                        "seer registries",
                        "surveillance, epidemiology, and end results",
                        "surveillance, epidemiology and end results",
                    ])],
                    ..Condition::default()
                },
                category: Category::Infrastructure,
                confidence: 85,
            },
            CodeRule {
                name: "coordinating_center".to_string(),
                when: Condition {
                    title_any_of: list(&[
                        "coordinating center",
                        "coordination center",
                        "data coordinating",
                        "data sharing center",
                    ]),
                    ..Condition::default()
                },
                category: Category::Infrastructure,
                confidence: 80,
            },
        ],
    }
}

fn standard_organizations() -> OrgIndicators {
    OrgIndicators {
        company: list(&[
            " llc ",
            " l l c ",
            " inc ",
            " incorporated ",
            " corp ",
            " corporation ",
            " ltd ",
            " lp ",
            " pbc ",
            " gmbh ",
            "therapeutics",
            "biosciences",
            "bioscience",
            "pharmaceuticals",
            "pharmaceutical",
            "biotech",
            "biopharma",
            " pharma ",
            "technologies",
            " labs ",
            "diagnostics",
            "genomics",
            "biomedical solutions",
        ]),
        research_institutes: list(&[
            "scripps",
            "broad institute",
            "salk institute",
            "fred hutchinson",
            "fred hutch",
            "sloan kettering",
            "sloan-kettering",
            "dana-farber",
            "dana farber",
            "cold spring harbor",
            "jackson laboratory",
            "wistar",
            "allen institute",
            "stowers",
            "whitehead institute",
            "van andel",
            "research triangle",
            "la jolla institute",
            "pennington biomedical",
            "st jude children",
            "hudsonalpha",
            "hudson alpha",
            "morgridge",
            "gladstone",
            "woods hole",
            "benaroya",
            "sanford burnham",
            "sanford-burnham",
            "beckman research",
            "battelle",
            "feinstein institute",
            "lundquist institute",
            "j craig venter",
            "oklahoma medical research foundation",
        ]),
        university: list(&[
            "universit",
            " univ ",
            "college",
            "school of medicine",
            "medical school",
            "school of public health",
            "institute of technology",
            "polytechnic",
            "johns hopkins",
            "weill cornell",
            "rockefeller",
            "caltech",
            "icahn school",
            "albert einstein",
            "morehouse school",
            "meharry",
        ]),
        hospital: list(&[
            "hospital",
            " hosp ",
            "medical center",
            " med ctr ",
            "medical ctr",
            "health system",
            "clinic",
            "health center",
            "health care",
            "children's",
            "childrens",
            "mayo",
            "cedars-sinai",
            "kaiser",
            "brigham",
            "massachusetts general",
            "mass general",
            "mount sinai",
            "beth israel",
            "city of hope",
            "md anderson",
            "national jewish health",
            "methodist",
        ]),
    }
}

fn basic_research() -> CategoryRules {
    CategoryRules {
        category: Category::BasicResearch,
        strong: list(&[
            "elucidate the mechanism",
            "elucidate the role",
            "understand the mechanism",
            "understand the role",
            "understand how",
            "define the mechanism",
            "determine the mechanism",
            "determine how",
            "investigate the mechanism",
            "investigate the role",
            "underlying mechanisms",
            "mechanisms underlying",
            "mechanisms by which",
            "molecular basis of",
            "molecular mechanisms",
            "cellular mechanisms",
            "neural mechanisms",
            "signaling pathway",
            "signal transduction",
            "gene regulation",
            "transcriptional regulation",
            "epigenetic regulation",
            "structure-function",
            "fundamental understanding",
            "central hypothesis",
            "we hypothesize",
            "poorly understood",
            "remains unclear",
            "little is known",
            "knowledge gap",
        ]),
        moderate: list(&[
            "role of",
            "function of",
            "mechanism of",
            "pathway",
            "regulation of",
            "gene expression",
            "genetic basis",
            "etiology",
            "pathogenesis",
            "pathophysiology",
            "mouse model",
            "knockout",
            "transgenic",
            "zebrafish",
            "drosophila",
            "c elegans",
            "chromatin",
            "transcription factor",
            "neural circuit",
            "protein structure",
            "cryo-em",
            "autophagy",
            "apoptosis",
            "cell cycle",
            "cell fate",
            "microbiome",
            "innate immun",
            "adaptive immun",
        ]),
        title_terms: list(&[
            "mechanism",
            "regulation",
            "pathway",
            "circuit",
            "role of",
            "function of",
            "biology of",
            "basis of",
            "dynamics of",
            "structure of",
            "modulation of",
        ]),
        gate: None,
    }
}

fn therapeutics() -> CategoryRules {
    CategoryRules {
        category: Category::Therapeutics,
        strong: list(&[
            "clinical trial",
            "phase i ",
            "phase ii",
            "phase iii",
            "phase 1 ",
            "phase 2 ",
            "phase 3 ",
            "drug development",
            "drug discovery",
            "drug design",
            "drug candidate",
            "lead compound",
            "lead optimization",
            "hit-to-lead",
            "ind-enabling",
            "investigational new drug",
            "therapeutic development",
            "therapeutic candidate",
            "vaccine development",
            "vaccine candidate",
            "car-t",
            "chimeric antigen receptor",
            "gene therapy for",
            "cell therapy for",
            "antisense oligonucleotide",
            "bispecific antibody",
            "randomized controlled trial",
            "placebo-controlled",
            "efficacy and safety",
            "pharmacokinetic",
            "pharmacodynamic",
            "dose escalation",
            "preclinical development",
            "preclinical efficacy",
            "first-in-human",
            "medicinal chemistry",
            "structure-activity relationship",
            "drug repurpos",
        ]),
        moderate: list(&[
            "treatment of",
            "therapy for",
            "therapeutic",
            "inhibitor of",
            "agonist",
            "antagonist",
            "small molecule",
            "prodrug",
            "formulation",
            "clinical efficacy",
            "anti-tumor",
            "antitumor",
            "antiviral",
            "antimicrobial",
            "antibiotic",
            "immunotherapy",
            "immune checkpoint",
            "dosing",
        ]),
        title_terms: list(&[
            "treatment",
            "therapy",
            "therapeutic",
            "drug",
            "vaccine",
            "inhibitor",
            "clinical trial",
            "immunotherapy",
            "antiviral",
        ]),
        gate: None,
    }
}

fn biotools() -> CategoryRules {
    CategoryRules {
        category: Category::Biotools,
        strong: list(&[
            "develop a platform for",
            "develop a tool for",
            "develop software for",
            "develop a pipeline for",
            "develop an assay for",
            "novel platform for",
            "novel tool for",
            "novel assay for",
            "novel probe for",
            "screening platform",
            "high-throughput screening",
            "computational pipeline",
            "computational tool",
            "computational framework",
            "software tool",
            "database for",
            "atlas of",
            "open source",
            "open-source",
            "publicly available",
            "community resource",
            "research community",
            "for researchers",
            "reference standard",
            "r package",
            "python package",
            "web server",
            "user-friendly",
            "disseminat",
            "made available to",
        ]),
        moderate: list(&[
            "sequencing method",
            "imaging method",
            "assay development",
            "biosensor",
            "bioinformatics tool",
            "data resource",
            "statistical method",
            "machine learning tool",
            "repository",
            "high-throughput",
            "platform",
            "toolkit",
        ]),
        title_terms: list(&[
            "platform",
            "pipeline for",
            "tool for",
            "toolkit",
            "atlas of",
            "database",
            "resource for",
            "assay for",
            "probe for",
            "high-throughput",
            "computational tool",
            "software for",
            "method for",
        ]),
        gate: Some(PhraseGate {
            any_of: list(&[
                "develop a platform",
                "develop a tool",
                "develop software",
                "develop a pipeline",
                "develop an assay",
                "develop a method",
                "develop a high-throughput",
                "develop new methods",
                "develop novel methods",
                "create a platform",
                "create a tool",
                "build a pipeline",
                "novel platform",
                "novel tool",
                "novel assay",
                "novel probe",
                "open source",
                "open-source",
                "publicly available",
                "widely available",
                "community resource",
                "for researchers",
                "research community",
                "for the field",
                "user-friendly",
                "web server",
                "downloadable",
                "r package",
                "python package",
                "software package",
                "reference standard",
                "reference material",
                "made available to",
                "disseminat",
            ]),
            ungated_title_weight: 2,
        }),
    }
}

fn diagnostics() -> CategoryRules {
    CategoryRules {
        category: Category::Diagnostics,
        strong: list(&[
            "diagnostic test",
            "diagnostic assay",
            "diagnostic accuracy",
            "early detection of",
            "screening test",
            "cancer screening",
            "sensitivity and specificity",
            "roc curve",
            "companion diagnostic",
            "point-of-care",
            "point of care",
            "liquid biopsy",
            "circulating tumor",
            "cell-free dna",
            "biomarker panel",
            "biomarker validation",
            "clinical validation",
            "rapid diagnostic",
            "lateral flow",
            "newborn screening",
            "prenatal screening",
            "prognostic biomarker",
            "predictive biomarker",
        ]),
        moderate: list(&[
            "diagnostic",
            "early detection",
            "detection of",
            "screening",
            "biomarker",
            "prognostic",
            "risk stratification",
            "radiomics",
        ]),
        title_terms: list(&[
            "diagnostic",
            "diagnosis",
            "early detection",
            "detection of",
            "screening test",
            "screening for",
            "liquid biopsy",
            "point-of-care",
            "biomarker",
        ]),
        gate: None,
    }
}

fn medical_device() -> CategoryRules {
    CategoryRules {
        category: Category::MedicalDevice,
        strong: list(&[
            "implantable device",
            "neural implant",
            "cochlear implant",
            "prosthetic",
            "prosthesis",
            "surgical instrument",
            "surgical robot",
            "brain-computer interface",
            "brain computer interface",
            "neural interface",
            "neuroprosthe",
            "tissue-engineered",
            "tissue engineering",
            "bioresorbable",
            "stent",
            "catheter",
            "pacemaker",
            "defibrillator",
            "exoskeleton",
            "microneedle",
            "microelectrode array",
            "retinal prosthe",
            "surgical navigation",
            "image-guided surgery",
            "medical device",
            "wearable device",
            "deep brain stimulation",
            "neuromodulation device",
        ]),
        moderate: list(&[
            "implant",
            "scaffold",
            "biocompat",
            "biodegrad",
            "electrode",
            "wearable",
            "device",
            "biomaterial",
        ]),
        title_terms: list(&[
            "implant",
            "prosthe",
            "stent",
            "catheter",
            "device",
            "scaffold",
            "exoskeleton",
            "microneedle",
            "neural interface",
            "brain-computer",
            "cochlear",
            "electrode",
        ]),
        gate: Some(PhraseGate {
            any_of: list(&[
                "develop",
                "design",
                "fabricat",
                "engineer",
                "prototype",
                "optimiz",
                "novel",
                "implantable",
                "510(k)",
                "fda clearance",
                "bench testing",
                "first-in-human",
                "clinical translation",
            ]),
            ungated_title_weight: 2,
        }),
    }
}

fn digital_health() -> CategoryRules {
    CategoryRules {
        category: Category::DigitalHealth,
        strong: list(&[
            "telemedicine",
            "telehealth",
            "mhealth",
            "m-health",
            "mobile health",
            "digital health",
            "digital therapeutic",
            "digital intervention",
            "mobile app",
            "smartphone app",
            "remote patient monitoring",
            "remote monitoring",
            "clinical decision support",
            "electronic health record",
            "ehr integration",
            "patient portal",
            "text message intervention",
            "sms-based",
        ]),
        moderate: list(&[
            "web-based intervention",
            "online intervention",
            "chatbot",
            "virtual reality",
            "telemonitoring",
            "app-based",
            "smartphone",
            "wearable",
            "self-management",
        ]),
        title_terms: list(&[
            "telehealth",
            "telemedicine",
            "mhealth",
            "digital health",
            "remote monitoring",
            "digital therapeutic",
            "mobile health",
            "app for",
            "smartphone",
            "electronic health record",
            "clinical decision support",
        ]),
        gate: Some(PhraseGate {
            any_of: list(&[
                "patient",
                "clinician",
                "provider",
                "physician",
                "clinical setting",
                "clinical practice",
                "clinic",
                "hospital",
                "primary care",
                "emergency department",
                "health system",
                "health care",
                "healthcare",
                "participant",
                "caregiver",
                "consumer",
                "end user",
            ]),
            ungated_title_weight: 4,
        }),
    }
}

fn other() -> CategoryRules {
    CategoryRules {
        category: Category::Other,
        strong: list(&[
            "health disparit",
            "health equity",
            "social determinants of health",
            "implementation science",
            "implementation strateg",
            "dissemination and implementation",
            "community-based participatory",
            "community health worker",
            "behavioral intervention",
            "cohort study",
            "longitudinal cohort",
            "prospective cohort",
            "epidemiologic",
            "population-based",
            "health services research",
            "health care delivery",
            "quality improvement",
            "quality of care",
            "cost-effectiveness",
            "cost effectiveness",
            "health policy",
            "smoking cessation",
            "weight management",
            "lifestyle intervention",
            "lifestyle modification",
            "motivational interviewing",
            "cognitive behavioral therapy",
            "mindfulness-based",
            "psychosocial intervention",
            "culturally tailored",
            "violence prevention",
            "injury prevention",
            "occupational health",
            "occupational safety",
            "food safety",
            "environmental health",
            "environmental exposure",
            "health literacy",
            "health communication",
            "patient navigation",
            "care coordination",
        ]),
        moderate: list(&[
            "disparities",
            "inequity",
            "social support",
            "peer support",
            "self-efficacy",
            "stigma",
            "substance use disorder",
            "alcohol use",
            "adherence",
            "qualitative",
            "focus group",
            "community engagement",
            "caregiver",
            "social isolation",
            "loneliness",
            "health behavior",
            "quality of life",
            "well-being",
            "wellbeing",
            "physical activity",
            "mindfulness",
            "psychosocial",
            "counseling",
        ]),
        title_terms: list(&[
            "disparit",
            "equity",
            "implementation",
            "behavioral intervention",
            "cessation",
            "prevention",
            "occupational",
            "environmental exposure",
            "community",
            "caregiver",
            "mindfulness",
        ]),
        gate: None,
    }
}

fn add(category: Category, points: i32) -> Adjustment {
    Adjustment::Add { category, points }
}

fn subtract(category: Category, points: i32) -> Adjustment {
    Adjustment::Subtract { category, points }
}

fn rule(name: &str, when: Condition, effects: Vec<Adjustment>) -> OverrideRule {
    OverrideRule {
        name: name.to_string(),
        when,
        effects,
    }
}

/// Ordered exception table. New exceptions are appended here (or in a rules
/// file) rather than coded into the scorer.
fn standard_overrides() -> Vec<OverrideRule> {
    vec![
        rule(
            "small_business_commercialization",
            Condition {
                activity_codes: list(SMALL_BUSINESS_CODES),
                ..Condition::default()
            },
            vec![
                Adjustment::Zero {
                    category: Category::BasicResearch,
                },
                add(Category::Therapeutics, 3),
                add(Category::MedicalDevice, 2),
                add(Category::Diagnostics, 2),
                add(Category::Biotools, 2),
                add(Category::DigitalHealth, 1),
            ],
        ),
        rule(
            "resource_program_code",
            Condition {
                activity_codes: list(&["R24", "P40", "P41"]),
                ..Condition::default()
            },
            vec![add(Category::Biotools, 8)],
        ),
        rule(
            "develops_research_tool",
            Condition {
                any_of: vec![list(&[
                    "develop a platform",
                    "develop a tool",
                    "develop a method",
                    "develop an assay",
                    "develop a pipeline",
                    "develop software",
                    "novel assay",
                    "novel platform",
                    "publicly available database",
                    "make available to the research community",
                    "made available to the research community",
                ])],
                ..Condition::default()
            },
            vec![add(Category::Biotools, 4)],
        ),
        rule(
            "uses_existing_tool",
            Condition {
                opening_any_of: list(&[
                    "we will use",
                    "we use",
                    "using",
                    "employing",
                    "applying",
                    "utilizing",
                    "leveraging",
                ]),
                none_of: list(&[
                    "develop", "create", "build", "design", "engineer", "optimiz", "improve",
                    "validate", "novel",
                ]),
                ..Condition::default()
            },
            vec![subtract(Category::Biotools, 10)],
        ),
        rule(
            "behavioral_without_drug",
            Condition {
                any_of: vec![list(BEHAVIORAL_TERMS)],
                none_of: list(DRUG_TERMS),
                ..Condition::default()
            },
            vec![add(Category::Other, 15), subtract(Category::Therapeutics, 10)],
        ),
        rule(
            "behavioral_with_drug",
            Condition {
                any_of: vec![list(BEHAVIORAL_TERMS), list(DRUG_TERMS)],
                ..Condition::default()
            },
            vec![
                add(Category::Therapeutics, 10),
                Adjustment::Outrank {
                    category: Category::Therapeutics,
                    over: Category::Other,
                    by: 5,
                },
            ],
        ),
        rule(
            "veterinary_diagnostics",
            Condition {
                any_of: vec![
                    list(&[
                        "veterinary",
                        "livestock",
                        "companion animal",
                        "animal health",
                        "cattle",
                        "poultry",
                        "swine",
                        "canine",
                        "feline",
                        "equine",
                    ]),
                    list(&["diagnostic", "detection", "screening", "assay"]),
                ],
                ..Condition::default()
            },
            vec![
                Adjustment::Zero {
                    category: Category::Diagnostics,
                },
                add(Category::Other, 6),
            ],
        ),
        rule(
            "policy_document_analysis",
            Condition {
                any_of: vec![list(&[
                    "advertising",
                    "marketing claims",
                    "industry documents",
                    "policy analysis",
                    "legislation",
                    "regulatory documents",
                    "media content",
                    "social media posts",
                    "package labeling",
                    "news coverage",
                ])],
                ..Condition::default()
            },
            vec![subtract(Category::Therapeutics, 8), add(Category::Other, 4)],
        ),
        rule(
            "phase_trial_title",
            Condition {
                title_patterns: list(&[r"\bphase\s+(i{1,3}|iv|[1-4])(\b|/)"]),
                ..Condition::default()
            },
            vec![add(Category::Therapeutics, 10)],
        ),
        rule(
            "placebo_randomized",
            Condition {
                any_of: vec![list(&["placebo"]), list(&["randomiz", "randomis"])],
                ..Condition::default()
            },
            vec![add(Category::Therapeutics, 4)],
        ),
        rule(
            "clinical_assay_context",
            Condition {
                title_any_of: list(&["assay", "test", "detection"]),
                any_of: vec![list(&[
                    "clinical use",
                    "clinical application",
                    "patient samples",
                    "clinical validation",
                    "point-of-care",
                    "clinical utility",
                    "clinical test",
                ])],
                ..Condition::default()
            },
            vec![add(Category::Diagnostics, 6)],
        ),
        rule(
            "drug_delivery_system",
            Condition {
                any_of: vec![list(&[
                    "drug delivery",
                    "deliver therapeutic",
                    "deliver treatment",
                    "targeted delivery",
                ])],
                ..Condition::default()
            },
            vec![add(Category::Therapeutics, 2), subtract(Category::Biotools, 2)],
        ),
        rule(
            "epidemiology_without_mechanism",
            Condition {
                any_of: vec![list(&[
                    "cohort study",
                    "epidemiologic",
                    "population-based study",
                    "longitudinal study",
                    "prospective study",
                ])],
                none_of: list(&[
                    "mechanism",
                    "pathway",
                    "signaling",
                    "molecular",
                    "gene expression",
                    "transcriptom",
                    "proteom",
                ]),
                ..Condition::default()
            },
            vec![add(Category::Other, 4), subtract(Category::BasicResearch, 3)],
        ),
        rule(
            "statistical_method_development",
            Condition {
                any_of: vec![list(&[
                    "novel statistical method",
                    "develop statistical",
                    "develop computational method",
                    "new algorithm for",
                    "develop machine learning method",
                ])],
                ..Condition::default()
            },
            vec![add(Category::Biotools, 4)],
        ),
        rule(
            "mechanism_of_action_study",
            Condition {
                any_of: vec![list(&[
                    "mechanism of action",
                    "mechanisms of action",
                    "mechanism of resistance",
                    "mechanisms of resistance",
                ])],
                none_of: list(&[
                    "lead optimization",
                    "clinical trial",
                    "drug delivery",
                    "ind-enabling",
                ]),
                ..Condition::default()
            },
            vec![add(Category::BasicResearch, 3)],
        ),
        rule(
            "knowledge_outweighs_tooling",
            Condition {
                none_of: list(&[
                    "publicly available",
                    "open source",
                    "open-source",
                    "disseminat",
                    "community resource",
                    "research community",
                ]),
                scores: vec![ScoreTest::Exceeds {
                    category: Category::BasicResearch,
                    other: Category::Biotools,
                }],
                ..Condition::default()
            },
            vec![subtract(Category::Biotools, 4)],
        ),
        rule(
            "lifestyle_app_without_clinical_integration",
            Condition {
                any_of: vec![list(&["web app", "web-app", "physical activity", "lifestyle"])],
                none_of: list(&[
                    "telemedicine",
                    "telehealth",
                    "electronic health record",
                    "clinical decision support",
                ]),
                ..Condition::default()
            },
            vec![subtract(Category::DigitalHealth, 3), add(Category::Other, 1)],
        ),
        rule(
            "therapeutic_title_focus",
            Condition {
                title_any_of: list(&["therapy", "treatment", "therapeutic", "repair", "rescue"]),
                scores: vec![
                    ScoreTest::Exceeds {
                        category: Category::BasicResearch,
                        other: Category::Therapeutics,
                    },
                    ScoreTest::AtLeast {
                        category: Category::Therapeutics,
                        points: 3,
                    },
                ],
                ..Condition::default()
            },
            vec![add(Category::Therapeutics, 4)],
        ),
    ]
}

fn standard_evidence() -> EvidenceRules {
    EvidenceRules {
        phr_developer: list(&[
            "we are developing",
            "we will develop",
            "our technology",
            "our product",
            "our platform",
            "our device",
            "our assay",
            "our software",
            "commercializ",
            "to market",
            "customers",
            "will be sold",
            "will be made available",
        ]),
        phr_user: list(&[
            "we will use",
            "we will apply",
            "using existing",
            "leveraging existing",
            "to study",
            "to understand",
            "to investigate",
        ]),
        title_developer: list(&[
            "development of",
            "developing",
            "a novel",
            "platform for",
            "tool for",
            "system for",
            "kit for",
            "instrument for",
            "software for",
            "assay for",
        ]),
        abstract_developer: list(&[
            "we will develop",
            "we have developed",
            "we developed",
            "we will build",
            "we will engineer",
            "we will create",
            "novel platform",
            "novel instrument",
            "novel assay",
            "prototype",
        ]),
        abstract_commercial: list(&[
            "commercializ",
            "market",
            "customers",
            "sales",
            "pricing",
            "manufactur",
            "sbir",
            "phase ii",
            "product",
            "license",
        ]),
        abstract_user: list(&[
            "we will use",
            "using established",
            "using existing",
            "we will apply",
            "we will employ",
            "leveraging existing",
        ]),
        methods_journals: list(&[
            "nat methods",
            "nature methods",
            "bioinformatics",
            "nucleic acids res",
            "nucleic acids research",
            "anal chem",
            "analytical chemistry",
            "lab chip",
            "lab on a chip",
            "biosens bioelectron",
            "biosensors and bioelectronics",
            "sci rep",
            "plos comput biol",
            "bmc bioinformatics",
            "genome res",
            "genome research",
            "nat biotechnol",
            "nature biotechnology",
            "methods",
            "j proteome res",
            "mol cell proteomics",
            "cytometry a",
            "j neurosci methods",
            "acs sens",
            "acs nano",
        ]),
        therapeutic_journals: list(&[
            "n engl j med",
            "new england journal of medicine",
            "lancet",
            "jama",
            "j clin oncol",
            "journal of clinical oncology",
            "blood",
            "cancer res",
            "cancer research",
            "clin cancer res",
            "j med chem",
            "journal of medicinal chemistry",
            "mol ther",
            "molecular therapy",
            "sci transl med",
            "science translational medicine",
            "nat med",
            "nature medicine",
            "cell",
        ]),
        device_patent_terms: list(&[
            "device",
            "apparatus",
            "system",
            "instrument",
            "sensor",
            "probe",
            "detector",
            "microfluidic",
            "platform",
            "kit",
            "assay",
            "method for detecting",
            "imaging",
            "sequencing",
            "array",
        ]),
        therapeutic_patent_terms: list(&[
            "compound",
            "composition",
            "pharmaceutical",
            "treatment",
            "treating",
            "therapy",
            "therapeutic",
            "inhibitor",
            "antibod",
            "vaccine",
            "formulation",
            "drug",
            "method of treating",
        ]),
        diagnostic_trial_terms: list(&[
            "diagnos",
            "detection",
            "screening",
            "imaging",
            "biomarker",
            "accuracy",
            "sensitivity",
            "specificity",
            "test performance",
        ]),
        weights: EvidenceWeights {
            small_business: 30,
            company_org: 10,
            phr_developer: 15,
            phr_user: -15,
            title_developer: 10,
            abstract_developer: 10,
            abstract_commercial: 15,
            abstract_user: -10,
            methods_journal_each: 10,
            methods_journal_cap: 25,
            therapeutic_journal_each: -5,
            therapeutic_journal_cap: -15,
            publication_volume_threshold: 10,
            publication_volume: -10,
            device_patent_each: 20,
            device_patent_cap: 40,
            therapeutic_patent_each: -10,
            therapeutic_patent_cap: -25,
            patent_ratio_threshold: 0.5,
            patent_ratio_bonus: 15,
            diagnostic_trials: -10,
            therapeutic_trials: -30,
            high_threshold: 60,
            moderate_threshold: 35,
        },
    }
}
