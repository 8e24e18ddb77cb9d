//! Deterministic fallback project generation.
//!
//! When provider output cannot be validated, the pipeline still has to hand
//! the caller something runnable. This module synthesizes a minimal canonical
//! project parameterized only by the suggested name. It never fails and
//! never calls a remote service.

use forge_domain::FileArtifact;

/// Convert a project name to a URL-safe slug
fn slugify(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Synthesize the canonical minimal project.
///
/// The set covers a manifest, a styling entry point, a root layout, a home
/// page, a README and a minimal type configuration. Paths are unique and the
/// output depends only on `name`.
pub fn fallback_project(name: &str) -> Vec<FileArtifact> {
    let slug = {
        let slug = slugify(name);
        if slug.is_empty() {
            "generated-app".to_string()
        } else {
            slug
        }
    };
    let title = if name.trim().is_empty() { &slug } else { name.trim() };

    vec![
        FileArtifact::file(
            "package.json",
            format!(
                r#"{{
  "name": "{slug}",
  "version": "0.1.0",
  "private": true,
  "scripts": {{
    "dev": "next dev",
    "build": "next build",
    "start": "next start"
  }},
  "dependencies": {{
    "next": "14.1.0",
    "react": "^18",
    "react-dom": "^18"
  }}
}}
"#
            ),
        )
        .with_language("json"),
        FileArtifact::file(
            "app/globals.css",
            ":root {\n  --background: #ffffff;\n  --foreground: #171717;\n}\n\nbody {\n  margin: 0;\n  color: var(--foreground);\n  background: var(--background);\n  font-family: system-ui, sans-serif;\n}\n",
        )
        .with_language("css"),
        FileArtifact::file(
            "app/layout.tsx",
            format!(
                r#"import './globals.css';

export const metadata = {{
  title: '{title}',
}};

export default function RootLayout({{ children }}: {{ children: React.ReactNode }}) {{
  return (
    <html lang="en">
      <body>{{children}}</body>
    </html>
  );
}}
"#
            ),
        )
        .with_language("tsx"),
        FileArtifact::file(
            "app/page.tsx",
            format!(
                r#"export default function Home() {{
  return (
    <main>
      <h1>{title}</h1>
      <p>Generated starter project.</p>
    </main>
  );
}}
"#
            ),
        )
        .with_language("tsx"),
        FileArtifact::file(
            "README.md",
            format!("# {title}\n\nMinimal starter generated by AppForge.\n\n```sh\nnpm install\nnpm run dev\n```\n"),
        )
        .with_language("markdown"),
        FileArtifact::file(
            "tsconfig.json",
            r#"{
  "compilerOptions": {
    "target": "ES2020",
    "lib": ["dom", "esnext"],
    "jsx": "preserve",
    "module": "esnext",
    "moduleResolution": "bundler",
    "strict": true,
    "skipLibCheck": true
  },
  "include": ["app"]
}
"#,
        )
        .with_language("json"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fallback_is_deterministic() {
        let a = fallback_project("My Shop");
        let b = fallback_project("My Shop");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fallback_covers_canonical_roles() {
        let artifacts = fallback_project("demo");
        let paths: Vec<&str> = artifacts.iter().map(|a| a.path.as_str()).collect();
        for expected in [
            "package.json",
            "app/globals.css",
            "app/layout.tsx",
            "app/page.tsx",
            "README.md",
            "tsconfig.json",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_fallback_paths_are_unique() {
        let artifacts = fallback_project("demo");
        let mut seen = HashSet::new();
        assert!(artifacts.iter().all(|a| seen.insert(&a.path)));
    }

    #[test]
    fn test_name_is_slugified_into_manifest() {
        let artifacts = fallback_project("My Great Shop!");
        let manifest = &artifacts[0];
        assert!(manifest.content.contains("\"name\": \"my-great-shop\""));
    }

    #[test]
    fn test_empty_name_gets_a_default() {
        let artifacts = fallback_project("   ");
        assert!(artifacts[0].content.contains("generated-app"));
    }
}
