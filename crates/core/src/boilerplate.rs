use crate::profile::Engine;

impl Engine {
    /// Whether a raw line is non-substantive: delimiters, include/import and
    /// using lines, `main` signatures, trivial returns, console I/O.
    pub fn is_boilerplate(&self, raw_line: &str) -> bool {
        self.boilerplate.is_match(raw_line)
    }
}

#[cfg(test)]
mod tests {
    use crate::LanguageProfile;

    #[test]
    fn recognizes_boilerplate_across_syntaxes() {
        let engine = LanguageProfile::default().compile().unwrap();
        for line in [
            "",
            "   ",
            "{",
            "  });",
            "} else {",
            "#include <stdio.h>",
            "# include <vector>",
            "using namespace std;",
            "import java.util.Scanner;",
            "from math import sqrt",
            "int main() {",
            "void main(void)",
            "def main():",
            "    public static void main(String[] args) {",
            "if __name__ == \"__main__\":",
            "return 0;",
            "return;",
            "    return",
            "cout << x << endl;",
            "std::cerr << \"err\";",
            "printf(\"%d\", n);",
            "print(total)",
            "input()",
            "System.out.println(x);",
        ] {
            assert!(engine.is_boilerplate(line), "{line:?}");
        }
    }

    #[test]
    fn substantive_lines_are_not_boilerplate() {
        let engine = LanguageProfile::default().compile().unwrap();
        for line in [
            "int x = 5;",
            "x = input()",
            "return x + 1;",
            "int compute(int n) {",
            "for (int i = 0; i < n; i++)",
            "total += printf_count;",
            "maintain(state);",
        ] {
            assert!(!engine.is_boilerplate(line), "{line:?}");
        }
    }

    #[test]
    fn custom_patterns_replace_the_defaults() {
        let mut profile = LanguageProfile::c_family();
        profile.boilerplate_patterns = vec![r"^\s*package\s".to_string()];
        let engine = profile.compile().unwrap();
        assert!(engine.is_boilerplate("package main"));
        assert!(!engine.is_boilerplate("#include <x>"));
    }
}
