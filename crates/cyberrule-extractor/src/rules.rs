//! Built-in rule tables
//!
//! Each entry is `(label, regex)`. Labels are the canonical names the
//! normalizer turns into class identifiers; regexes are compiled
//! case-insensitively. Order inside a table is registration order, which
//! breaks ties between patterns of equal priority.

use cyberrule_core::{Category, Result};

use crate::pattern::Pattern;

/// Per-category registration settings for the built-in tables
pub struct RuleSet {
    pub category: Category,
    pub predicate: &'static str,
    pub priority: i32,
    pub source: &'static str,
    pub rules: &'static [(&'static str, &'static str)],
}

/// Built-in rule sets, highest priority first
pub const RULE_SETS: [RuleSet; 4] = [
    RuleSet {
        category: Category::VulnerabilityType,
        predicate: "hasVulnerabilityType",
        priority: 100,
        source: "CWE",
        rules: VULNERABILITY_RULES,
    },
    RuleSet {
        category: Category::Product,
        predicate: "affectsProduct",
        priority: 90,
        source: "CPE",
        rules: PRODUCT_RULES,
    },
    RuleSet {
        category: Category::Component,
        predicate: "affectsComponent",
        priority: 80,
        source: "ATTACK",
        rules: COMPONENT_RULES,
    },
    RuleSet {
        category: Category::Privilege,
        predicate: "requiresPrivilege",
        priority: 70,
        source: "CVSS",
        rules: PRIVILEGE_RULES,
    },
];

/// Compile every built-in rule into a pattern
pub fn builtin_patterns() -> Result<Vec<Pattern>> {
    let mut patterns = Vec::new();
    for set in &RULE_SETS {
        for (label, regex) in set.rules {
            patterns.push(
                Pattern::new(*label, regex, set.category)?
                    .with_predicate(set.predicate)
                    .with_priority(set.priority)
                    .with_source(set.source),
            );
        }
    }
    Ok(patterns)
}

/// Weakness types, named after CWE entries
pub const VULNERABILITY_RULES: &[(&str, &str)] = &[
    ("CrossSiteScripting", r"\bXSS\b|\bcross.?site scripting\b"),
    ("SQLInjection", r"\bSQLi?\b|\bSQL injection\b"),
    ("CSRF", r"\bCSRF\b|\bcross.?site request forgery\b"),
    ("SSRF", r"\bSSRF\b|\bserver.?side request forgery\b"),
    ("XXE", r"\bXXE\b|\bXML external entity\b"),
    ("LocalFileInclusion", r"\bLFI\b|\blocal file inclusion\b"),
    ("RemoteFileInclusion", r"\bRFI\b|\bremote file inclusion\b"),
    ("OpenRedirect", r"\bopen redirect\b"),
    ("CRLFInjection", r"\bCRLF injection\b"),
    ("ServerSideTemplateInjection", r"\bSSTI\b|\bserver.?side template injection\b"),
    ("HTTPHeaderInjection", r"\bHTTP header injection\b"),
    ("HTTPResponseSplitting", r"\bHTTP response splitting\b"),
    ("AuthenticationBypass", r"\bauthn?\b|\bauthentication bypass\b"),
    ("SessionFixation", r"\bsession fixation\b"),
    ("InsecureDirectObjectReference", r"\binsecure direct object reference\b"),
    ("WeakPasswordPolicy", r"\bweak password policy\b"),
    ("CredentialStuffing", r"\bcredential stuffing\b"),
    ("BruteForceAttack", r"\bbrute force\b"),
    ("BufferOverflow", r"\bbuffer overflow\b"),
    ("HeapOverflow", r"\bheap overflow\b"),
    ("StackOverflow", r"\bstack overflow\b"),
    ("UseAfterFree", r"\buse.?after.?free\b"),
    ("DoubleFree", r"\bdouble free\b"),
    ("MemoryLeak", r"\bmemory leak\b"),
    ("WildPointer", r"\bwild pointer\b"),
    ("CommandInjection", r"\bcommand injection\b"),
    ("OSCommandInjection", r"\bOS command injection\b"),
    ("LDAPInjection", r"\bLDAP injection\b"),
    ("XPathInjection", r"\bXPath injection\b"),
    ("MailCommandInjection", r"\bmail command injection\b"),
    ("Misconfiguration", r"\bmisconfiguration\b"),
    ("DefaultCredentials", r"\bdefault credentials\b"),
    ("DebugModeEnabled", r"\bdebug mode enabled\b"),
    ("Backdoor", r"\bbackdoor\b"),
    ("ContainerEscape", r"\bcontainer escape\b"),
    ("PrivilegeEscalation", r"\bprivilege escalation\b"),
    ("IAMMisconfiguration", r"\bIAM misconfiguration\b"),
    ("UnauthenticatedAccess", r"\bunauthenticated access\b"),
    ("ExposedAPI", r"\bexposed (API|endpoint)\b"),
    ("ManInTheMiddle", r"\bman.?in.?the.?middle\b|\bMITM\b"),
    ("DNSSpoofing", r"\bDNS spoofing\b"),
    ("ARPSpoofing", r"\bARP spoofing\b"),
    ("IPSpoofing", r"\bIP spoofing\b"),
    ("BGPHijacking", r"\bBGP hijacking\b"),
    ("WeakCryptography", r"\bweak (crypto|encryption)\b"),
    ("WeakSSL", r"\bweak SSL\b"),
    ("SelfSignedCertificate", r"\bself-signed certificate\b"),
    ("CertificateVerification", r"\bcertificate verification\b"),
    ("InsufficientEntropy", r"\binsufficient entropy\b"),
    ("HTTPRequestSmuggling", r"\bHTTP request smuggling\b"),
    ("DNSCachePoisoning", r"\bDNS cache poisoning\b"),
    ("NTPAmplification", r"\bNTP amplification\b"),
    ("SMTPInjection", r"\bSMTP injection\b"),
    ("Spectre", r"\bSpectre\b"),
    ("Meltdown", r"\bMeltdown\b"),
    ("Rowhammer", r"\bRowhammer\b"),
    ("ColdBoot", r"\bCold Boot\b"),
    ("DLLHijacking", r"\bDLL hijacking\b"),
    ("DLLInjection", r"\bDLL injection\b"),
    ("WindowsPrivilegeEscalation", r"\bWindows privilege escalation\b"),
    ("LinuxPrivilegeEscalation", r"\bLinux privilege escalation\b"),
    ("SymlinkAttack", r"\bsymlink attack\b"),
    ("TOCTOU", r"\bTOCTOU\b"),
    ("AndroidIntentHijacking", r"\bAndroid intent hijacking\b"),
    ("iOSJailbreak", r"\biOS jailbreak\b"),
    ("MobileMITM", r"\bmobile MITM\b"),
];

/// Vendors and products, named after CPE vendor/product pairs
pub const PRODUCT_RULES: &[(&str, &str)] = &[
    ("PaloAlto_PAN-OS", r"\bPalo Alto Networks\b|\bPAN-OS\b"),
    ("Cisco", r"\bCisco\b"),
    ("Fortinet_FortiOS", r"\bFortinet\b|\bFortiOS\b"),
    ("CheckPoint", r"\bCheck Point\b"),
    ("Juniper_Junos", r"\bJuniper\b|\bJunos\b"),
    ("Apache", r"\bApache\b"),
    ("Nginx", r"\bNginx\b"),
    ("IIS", r"\bIIS\b"),
    ("Tomcat", r"\bTomcat\b"),
    ("Jetty", r"\bJetty\b"),
    ("MySQL", r"\bMySQL\b"),
    ("PostgreSQL", r"\bPostgreSQL\b|\bPostgres\b"),
    ("MongoDB", r"\bMongoDB\b"),
    ("OracleDB", r"\bOracle\b"),
    ("SQLServer", r"\bSQL Server\b"),
    ("Redis", r"\bRedis\b"),
    ("Cassandra", r"\bCassandra\b"),
    ("AWS", r"\bAWS\b"),
    ("Azure", r"\bAzure\b"),
    ("GCP", r"\bGCP\b|\bGoogle Cloud\b"),
    ("Kubernetes", r"\bKubernetes\b|\bk8s\b"),
    ("Docker", r"\bDocker\b"),
    ("OpenShift", r"\bOpenShift\b"),
    ("Linux_Kernel", r"\bLinux kernel\b"),
    ("Windows", r"\bWindows\b"),
    ("macOS", r"\bmacOS\b"),
    ("Android", r"\bAndroid\b"),
    ("iOS", r"\biOS\b"),
    ("PHP", r"\bPHP\b"),
    ("Python", r"\bPython\b"),
    ("Java", r"\bJava\b"),
    ("NodeJS", r"\bNode\.?js\b"),
    ("DotNet", r"\b\.NET\b"),
    ("Django", r"\bDjango\b"),
    ("SpringFramework", r"\bSpring\b"),
    ("RubyOnRails", r"\bRuby on Rails\b"),
    ("Laravel", r"\bLaravel\b"),
    ("Chrome", r"\bChrome\b"),
    ("Firefox", r"\bFirefox\b"),
    ("Safari", r"\bSafari\b"),
    ("Edge", r"\bEdge\b"),
    ("InternetExplorer", r"\bInternet Explorer\b|\bIE\b"),
    ("WordPress", r"\bWordPress\b"),
    ("Drupal", r"\bDrupal\b"),
    ("Joomla", r"\bJoomla\b"),
    ("Magento", r"\bMagento\b"),
    ("Shopify", r"\bShopify\b"),
    ("MikroTik_RouterOS", r"\bRouterOS\b"),
    ("Cisco_ASA", r"\bASA\b"),
    ("Cisco_IOS", r"\bIOS\b"),
    ("Cisco_NX-OS", r"\bNX-OS\b"),
    ("Sophos", r"\bSophos\b"),
    ("McAfee", r"\bMcAfee\b"),
    ("Symantec", r"\bSymantec\b"),
    ("TrendMicro", r"\bTrend Micro\b"),
    ("VMware", r"\bVMware\b"),
    ("HyperV", r"\bHyper-V\b"),
    ("KVM", r"\bKVM\b"),
    ("Xen", r"\bXen\b"),
    ("IoT_Device", r"\bIoT device\b"),
    ("IP_Camera", r"\bIP camera\b"),
    ("NAS_Device", r"\bNAS\b"),
    ("Router", r"\bRouter\b"),
    ("SmartTV", r"\bSmart TV\b"),
];

/// Affected component kinds
pub const COMPONENT_RULES: &[(&str, &str)] = &[
    ("NetworkAppliance", r"\bpanorama appliances?\b"),
    ("WebInterface", r"\bweb interface\b"),
    ("AdminPanel", r"\badmin panel\b"),
    ("API", r"\bAPI\b"),
    ("WebBrowser", r"\bbrowser\b"),
    ("Server", r"\bserver\b"),
    ("Client", r"\bclient\b"),
    ("Database", r"\bdatabase\b"),
    ("CloudInstance", r"\bcloud instance\b"),
    ("Container", r"\bcontainer\b"),
    ("VirtualMachine", r"\bvirtual machine\b|\bVM\b"),
    ("Microservice", r"\bmicroservice\b"),
    ("Endpoint", r"\bendpoint\b"),
    ("Firewall", r"\bfirewall\b"),
    ("Proxy", r"\bproxy\b"),
    ("Gateway", r"\bgateway\b"),
    ("LoadBalancer", r"\bload balancer\b"),
    ("AuthService", r"\bauthentication service\b"),
    ("PaymentGateway", r"\bpayment gateway\b"),
    ("MessageQueue", r"\bmessage queue\b"),
    ("Cache", r"\bcache\b"),
    ("CDN", r"\bCDN\b"),
    ("DNSServer", r"\bDNS server\b"),
    ("MailServer", r"\bmail server\b"),
    ("VPN", r"\bVPN\b"),
];

/// Privilege levels an attacker needs
pub const PRIVILEGE_RULES: &[(&str, &str)] = &[
    ("AuthenticatedUser", r"\bauthenticated\b"),
    ("Administrator", r"\badmin\b|\badministrator\b"),
    ("ReadWriteAccess", r"\bread.?write\b"),
    ("RootAccess", r"\broot\b"),
    ("PrivilegedUser", r"\bprivileged\b"),
    ("Superuser", r"\bsuperuser\b"),
    ("System", r"\bsystem\b"),
    ("NetworkAdmin", r"\bnetwork\b"),
    ("DomainAdmin", r"\bdomain admin\b"),
    ("Guest", r"\bguest\b"),
    ("Anonymous", r"\banonymous\b"),
    ("RemoteUser", r"\bremote user\b"),
    ("LocalUser", r"\blocal user\b"),
    ("ServiceAccount", r"\bservice account\b"),
    ("APIUser", r"\bAPI user\b"),
];
