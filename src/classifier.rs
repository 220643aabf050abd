use std::fmt;

use serde::{Deserialize, Serialize};

/// Routing category assigned to a user message before a reply is generated.
/// `Error` is never produced by `classify`; the response engine uses it for
/// failed provider exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Greeting,
    Code,
    Explanation,
    Comparison,
    Troubleshooting,
    General,
    #[serde(rename = "non-technical")]
    NonTechnical,
    Error,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Label::Greeting => "greeting",
            Label::Code => "code",
            Label::Explanation => "explanation",
            Label::Comparison => "comparison",
            Label::Troubleshooting => "troubleshooting",
            Label::General => "general",
            Label::NonTechnical => "non-technical",
            Label::Error => "error",
        };
        f.write_str(s)
    }
}

const GREETINGS: &[&str] = &[
    "hi", "hello", "hey", "hai", "halo", "hay", "hola", "greetings",
    "good morning", "good afternoon", "good evening", "selamat pagi",
    "selamat siang", "selamat sore", "selamat malam",
];

const IOT_HARDWARE: &[&str] = &[
    "microcontroller", "esp32", "arduino", "raspberry pi", "stm32",
    "sensor", "actuator", "board", "circuit", "component", "hardware",
    "device", "module", "shield", "breakout", "pin", "gpio", "i2c",
    "spi", "uart", "adc", "dac", "pwm", "relay", "motor", "led",
    "display", "screen", "camera", "rfid", "nfc", "bluetooth",
    "wifi", "ethernet", "usb", "serial", "power", "battery",
];

const IOT_SOFTWARE: &[&str] = &[
    "firmware", "code", "program", "software", "library", "api",
    "sdk", "ide", "compiler", "debug", "upload", "flash", "bootloader",
    "os", "operating system", "rtos", "thread", "task", "process",
    "memory", "storage", "file", "database", "log", "error",
];

const IOT_PROTOCOLS: &[&str] = &[
    "mqtt", "coap", "http", "websocket", "lora", "zigbee", "bluetooth",
    "wifi", "tcp", "udp", "ip", "network", "protocol", "communication",
    "wireless", "rf", "radio", "signal", "packet", "frame", "header",
    "payload", "encryption", "security", "authentication",
];

const IOT_CONCEPTS: &[&str] = &[
    "iot", "internet of things", "embedded", "system", "architecture",
    "design", "development", "implementation", "deployment", "testing",
    "monitoring", "control", "automation", "smart", "intelligent",
    "real-time", "low-power", "energy", "efficiency", "optimization",
    "performance", "reliability", "scalability", "security", "privacy",
    "data", "analytics", "processing", "storage", "cloud", "edge",
    "fog", "gateway", "server", "client", "node", "network", "mesh",
    "cluster", "distributed", "centralized", "decentralized",
];

const TECH_ELECTRONICS: &[&str] = &[
    "electronics", "circuit", "schematic", "pcb", "component",
    "resistor", "capacitor", "transistor", "diode", "ic",
    "power supply", "voltage", "current", "resistance",
    "analog", "digital", "signal", "frequency", "oscillator",
];

const TECH_PROGRAMMING: &[&str] = &[
    "programming", "coding", "algorithm", "data structure",
    "python", "c++", "java", "javascript", "rust", "go",
    "function", "class", "object", "variable", "loop",
    "condition", "array", "list", "string", "integer",
];

const TECH_NETWORKING: &[&str] = &[
    "network", "internet", "web", "server", "client",
    "protocol", "tcp/ip", "dns", "dhcp", "firewall",
    "router", "switch", "gateway", "proxy", "vpn",
];

const TECH_CLOUD: &[&str] = &[
    "cloud", "aws", "azure", "gcp", "serverless",
    "container", "docker", "kubernetes", "microservice",
    "api", "rest", "graphql", "database", "storage",
];

const TECH_AI_ML: &[&str] = &[
    "artificial intelligence", "machine learning", "deep learning",
    "neural network", "tensorflow", "pytorch", "scikit-learn",
    "regression", "classification", "clustering", "nlp",
    "computer vision", "reinforcement learning",
];

const TECH_SECURITY: &[&str] = &[
    "security", "cybersecurity", "encryption", "authentication",
    "authorization", "ssl", "tls", "vulnerability", "attack",
    "defense", "penetration testing", "firewall", "antivirus",
];

const APP_INDUSTRIAL: &[&str] = &[
    "industrial", "automation", "control", "plc", "scada",
    "manufacturing", "production", "quality", "maintenance",
    "predictive maintenance", "condition monitoring",
];

const APP_SMART_HOME: &[&str] = &[
    "smart home", "home automation", "smart device", "voice control",
    "smart lighting", "smart security", "smart thermostat",
    "smart appliance", "home assistant", "voice assistant",
];

const APP_HEALTHCARE: &[&str] = &[
    "healthcare", "medical", "wearable", "fitness", "tracker",
    "monitoring", "diagnosis", "treatment", "telemedicine",
    "medical device", "health data", "patient care",
];

const APP_TRANSPORTATION: &[&str] = &[
    "transportation", "vehicle", "automotive", "autonomous",
    "connected car", "fleet management", "traffic", "navigation",
    "logistics", "supply chain", "tracking", "monitoring",
];

const APP_AGRICULTURE: &[&str] = &[
    "agriculture", "farming", "precision", "irrigation",
    "monitoring", "automation", "greenhouse", "livestock",
    "crop", "soil", "weather", "climate", "sustainability",
];

const APP_ENVIRONMENT: &[&str] = &[
    "environment", "monitoring", "climate", "weather",
    "pollution", "air quality", "water quality", "noise",
    "conservation", "sustainability", "renewable energy",
];

// Group order is the in-domain priority tie-break: IoT core first, then
// related technology, then application domains.
const IOT_CORE: &[&[&str]] = &[IOT_HARDWARE, IOT_SOFTWARE, IOT_PROTOCOLS, IOT_CONCEPTS];
const RELATED_TECH: &[&[&str]] = &[
    TECH_ELECTRONICS,
    TECH_PROGRAMMING,
    TECH_NETWORKING,
    TECH_CLOUD,
    TECH_AI_ML,
    TECH_SECURITY,
];
const APPLICATIONS: &[&[&str]] = &[
    APP_INDUSTRIAL,
    APP_SMART_HOME,
    APP_HEALTHCARE,
    APP_TRANSPORTATION,
    APP_AGRICULTURE,
    APP_ENVIRONMENT,
];

const TECHNICAL_CONTEXT: &[&str] = &[
    "technical", "engineering", "project", "build", "create",
    "develop", "design", "implement", "solution", "system",
    "device", "application", "product", "prototype", "technology",
    "innovation", "research", "development", "science",
];

const CODE_KEYWORDS: &[&str] = &[
    "code", "program", "example", "implement", "write", "show me",
    "how to", "tutorial", "demo", "sample", "sketch", "script",
    "function", "method", "class", "object", "variable", "constant",
    "loop", "condition", "statement", "syntax", "error", "bug",
    "debug", "test", "compile", "upload", "flash", "run",
];

const EXPLANATION_KEYWORDS: &[&str] = &[
    "what is", "explain", "describe", "tell me about", "meaning",
    "definition", "overview", "introduction", "basics", "how does",
    "why", "when", "where", "which", "compare", "difference",
    "similarity", "advantage", "disadvantage", "benefit", "drawback",
];

const COMPARISON_KEYWORDS: &[&str] = &[
    "difference between", "compare", "vs", "versus", "which is better",
    "pros and cons", "advantages and disadvantages", "similarities",
    "differences", "better than", "worse than", "prefer", "choice",
    "selection", "recommendation", "suggestion", "alternative",
];

const TROUBLESHOOTING_KEYWORDS: &[&str] = &[
    "error", "problem", "issue", "fix", "solve", "troubleshoot",
    "debug", "not working", "failed", "crash", "hang", "freeze",
    "slow", "performance", "memory", "resource", "connection",
    "communication", "network", "hardware", "software", "compatibility",
];

fn contains_any(message: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| message.contains(keyword))
}

/// Classify a raw user message into a response category. Total function:
/// single-pass substring scanning, first matching category wins.
pub fn classify(text: &str) -> Label {
    let message = text.trim().to_lowercase();

    // Greetings take priority over everything else.
    if contains_any(&message, GREETINGS) {
        return Label::Greeting;
    }

    let in_domain = IOT_CORE
        .iter()
        .chain(RELATED_TECH.iter())
        .chain(APPLICATIONS.iter())
        .any(|group| contains_any(&message, group));

    if !in_domain {
        // Terminal decision for out-of-domain questions.
        return if contains_any(&message, TECHNICAL_CONTEXT) {
            Label::General
        } else {
            Label::NonTechnical
        };
    }

    if contains_any(&message, CODE_KEYWORDS) {
        Label::Code
    } else if contains_any(&message, EXPLANATION_KEYWORDS) {
        Label::Explanation
    } else if contains_any(&message, COMPARISON_KEYWORDS) {
        Label::Comparison
    } else if contains_any(&message, TROUBLESHOOTING_KEYWORDS) {
        Label::Troubleshooting
    } else {
        Label::General
    }
}
