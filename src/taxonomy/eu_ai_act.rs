use crate::models::RiskLevel;

pub struct TierRules {
    pub level: RiskLevel,
    pub heading: &'static str,
    pub rules: &'static [&'static str],
}

pub struct RoleDefinition {
    pub role: &'static str,
    pub definition: &'static str,
}

pub const REGULATION: &str = "Regulation (EU) 2024/1689";

pub const TIERS: &[TierRules] = &[
    TierRules {
        level: RiskLevel::Unacceptable,
        heading: "PROHIBITED AI SYSTEMS (Article 5 - Unacceptable Risk)",
        rules: &[
            "AI systems that deploy subliminal techniques to materially distort behavior causing harm",
            "AI systems that exploit vulnerabilities of specific groups (age, disability) causing harm",
            "Social scoring by public authorities leading to detrimental treatment",
            "Real-time remote biometric identification in publicly accessible spaces for law enforcement (with exceptions)",
            "Biometric categorization systems to infer sensitive attributes (race, political opinions, religion, etc.)",
            "Emotion recognition in workplace and educational institutions (with exceptions for medical/safety)",
            "Scraping facial images from internet/CCTV to create facial recognition databases",
        ],
    },
    TierRules {
        level: RiskLevel::High,
        heading: "HIGH-RISK AI SYSTEMS (Annex III)",
        rules: &[
            "Biometrics: Remote biometric identification, biometric categorization, emotion recognition",
            "Critical Infrastructure: Management and operation of road traffic, water, gas, electricity, heating",
            "Education/Vocational Training: Assessment and evaluation, monitoring, detecting plagiarism",
            "Employment: Recruitment, screening, evaluation, promotion, monitoring, termination decisions",
            "Essential Services: Creditworthiness assessment, risk assessment for insurance, emergency response dispatch",
            "Law Enforcement: Individual risk assessment, polygraphs, evaluation of evidence reliability, migration/asylum/border control management",
            "Justice and Democracy: Assisting judicial research, influencing elections or voting behavior",
        ],
    },
    TierRules {
        level: RiskLevel::Limited,
        heading: "LIMITED RISK AI SYSTEMS (Article 50 - Transparency Obligations)",
        rules: &[
            "AI systems intended to interact directly with natural persons (chatbots, virtual assistants)",
            "Emotion recognition systems (must inform users)",
            "Biometric categorization systems (must inform users)",
            "AI-generated or manipulated content (deep fakes, synthetic media) - must be clearly labeled",
        ],
    },
    TierRules {
        level: RiskLevel::Minimal,
        heading: "MINIMAL RISK AI SYSTEMS",
        rules: &[
            "Spam filters",
            "AI-enabled video games",
            "Inventory management systems",
            "Recommendation systems (e-commerce, content)",
            "Translation tools",
            "Most other AI applications not covered above",
        ],
    },
];

pub const ROLES: &[RoleDefinition] = &[
    RoleDefinition {
        role: "Provider",
        definition: "Natural or legal person that develops an AI system or has it developed with a view to placing it on the market or putting it into service under its own name or trademark",
    },
    RoleDefinition {
        role: "Deployer",
        definition: "Any natural or legal person using an AI system under its authority (the actual user/operator)",
    },
    RoleDefinition {
        role: "Distributor",
        definition: "Any natural or legal person in the supply chain (other than provider or importer) that makes an AI system available",
    },
    RoleDefinition {
        role: "User",
        definition: "Any natural or legal person using an AI system",
    },
];
