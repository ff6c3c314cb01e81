// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Static payloads pushed into every new repository.

use crate::github::Label;

/// Path of the workflow that applies the label taxonomy on first push.
pub const SETUP_WORKFLOW_PATH: &str = ".github/workflows/setup-labels.yml";

/// One file committed during setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: &'static str,
    pub content: &'static str,
    pub message: &'static str,
}

/// Files in push order. The workflow reads the provisioned secrets, so it
/// must stay last.
pub fn default_files() -> [TemplateFile; 3] {
    [LICENSE, CONTRIBUTING, SETUP_LABELS_WORKFLOW]
}

/// Label taxonomy applied by the workflow and by server-side sync.
pub fn default_labels() -> Vec<Label> {
    vec![
        Label::new("bug", "d73a4a", "Something isn't working"),
        Label::new("enhancement", "a2eeef", "New feature or request"),
        Label::new("documentation", "0075ca", "Improvements or additions to documentation"),
        Label::new("refactor", "fbca04", "Code change that neither fixes a bug nor adds a feature"),
        Label::new("performance", "5319e7", "Performance improvement"),
        Label::new("dependencies", "0366d6", "Dependency updates"),
    ]
}

const LICENSE: TemplateFile = TemplateFile {
    path: "LICENSE",
    message: "Add LICENSE file",
    content: r#"MIT License

Copyright (c) 2026 The repository authors

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
"#,
};

const CONTRIBUTING: TemplateFile = TemplateFile {
    path: "CONTRIBUTING.md",
    message: "Add CONTRIBUTING.md file",
    content: r#"# Contributing

## Workflow

1. Open an issue or pick an existing one
2. Branch off `main`
3. Implement the change
4. Open a pull request

## Branch names

```
fix/<feature>    # new feature
bug/<fix>        # bug fix
docs/<topic>     # documentation
ref/<topic>      # refactoring
```

## Commit messages

```
<kind>/<summary>

fix/add a feature
bug/fix a bug
docs/update documentation
ref/refactor
test/add or update tests
other/build or configuration changes
```

## Pull requests

- Reference the related issue
- Follow the pull request template
- Review your own diff before asking for review

## Code style

- Match the existing code in the project
"#,
};

const SETUP_LABELS_WORKFLOW: TemplateFile = TemplateFile {
    path: SETUP_WORKFLOW_PATH,
    message: "Add setup-labels workflow",
    content: r#"name: setup-labels

on:
  push:
    branches:
      - main

jobs:
  setup-labels:
    runs-on: ubuntu-latest
    steps:
      - name: Generate GitHub App Token
        id: generate-token
        uses: actions/create-github-app-token@v1
        with:
          app-id: ${{ secrets.APP_ID }}
          private-key: ${{ secrets.APP_PRIVATE_KEY }}

      - name: Check if already setup
        id: check
        run: |
          if gh label list --repo ${{ github.repository }} --json name --jq '.[].name' | grep -q "^refactor$"; then
            echo "skip=true" >> $GITHUB_OUTPUT
          else
            echo "skip=false" >> $GITHUB_OUTPUT
          fi
        env:
          GH_TOKEN: ${{ steps.generate-token.outputs.token }}

      - name: Delete all existing labels
        if: steps.check.outputs.skip == 'false'
        run: |
          gh label list --repo ${{ github.repository }} --json name --jq '.[].name' | while read -r label; do
            gh label delete "$label" --repo ${{ github.repository }} --yes
          done
        env:
          GH_TOKEN: ${{ steps.generate-token.outputs.token }}

      - name: Create labels
        if: steps.check.outputs.skip == 'false'
        run: |
          labels=(
            "bug|d73a4a|Something isn't working"
            "enhancement|a2eeef|New feature or request"
            "documentation|0075ca|Improvements or additions to documentation"
            "refactor|fbca04|Code change that neither fixes a bug nor adds a feature"
            "performance|5319e7|Performance improvement"
            "dependencies|0366d6|Dependency updates"
          )

          for label in "${labels[@]}"; do
            IFS='|' read -r name color description <<< "$label"
            gh label create "$name" --repo ${{ github.repository }} --color "$color" --description "$description"
          done
        env:
          GH_TOKEN: ${{ steps.generate-token.outputs.token }}
"#,
};
