//! Default tree installed on first run and by `reset`.

use indexmap::IndexMap;

use super::types::VfsNode;

const WELCOME_TXT: &str = "Welcome to the virtual file system!\nThis is a text file you can edit.";
const NOTES_MD: &str = "# Notes\n\n- Create files with 'touch' command\n- Edit files with 'edit' command\n- Remove files with 'rm' command";
const HELLO_JS: &str = "// JavaScript example\nconsole.log('Hello, world!');\n\nfunction greet(name) {\n  return `Hello, ${name}!`;\n}\n\ngreet('User');";
const BASHRC: &str = "# This is a simulated .bashrc file\n# In a real system, this would contain shell configuration";
const BIN_HELLO: &str = "#!/bin/bash\necho 'Hello World!'";

fn dir(now: u64, entries: Vec<(&str, VfsNode)>) -> VfsNode {
    let children = entries
        .into_iter()
        .map(|(name, node)| (name.to_string(), node))
        .collect::<IndexMap<_, _>>();
    VfsNode::Directory {
        children,
        created: now,
        modified: now,
    }
}

/// Builds a fresh seed tree with every node stamped `now`.
pub fn seed_tree(now: u64) -> VfsNode {
    let hello = VfsNode::File {
        content: BIN_HELLO.to_string(),
        created: now,
        modified: now,
        executable: true,
    };

    dir(
        now,
        vec![
            (
                "home",
                dir(
                    now,
                    vec![(
                        "user",
                        dir(
                            now,
                            vec![
                                (
                                    "Documents",
                                    dir(
                                        now,
                                        vec![
                                            ("welcome.txt", VfsNode::file(WELCOME_TXT, now)),
                                            ("notes.md", VfsNode::file(NOTES_MD, now)),
                                        ],
                                    ),
                                ),
                                (
                                    "Projects",
                                    dir(now, vec![("hello.js", VfsNode::file(HELLO_JS, now))]),
                                ),
                                (".bashrc", VfsNode::file(BASHRC, now)),
                            ],
                        ),
                    )],
                ),
            ),
            ("bin", dir(now, vec![("hello", hello)])),
            ("tmp", dir(now, Vec::new())),
        ],
    )
}
