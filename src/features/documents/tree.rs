use std::collections::HashMap;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::documents::dtos::FolderTreeDto;
use crate::features::documents::models::DocumentFolder;

/// Build the nested folder tree from a flat list, children sorted by name.
///
/// Folders whose parent is not in the list are treated as roots.
pub fn build_tree(folders: Vec<DocumentFolder>) -> Vec<FolderTreeDto> {
    let known: std::collections::HashSet<Uuid> = folders.iter().map(|f| f.id).collect();

    let mut by_parent: HashMap<Option<Uuid>, Vec<DocumentFolder>> = HashMap::new();
    for folder in folders {
        let parent = folder.parent_id.filter(|p| known.contains(p));
        by_parent.entry(parent).or_default().push(folder);
    }

    build_level(None, &mut by_parent)
}

fn build_level(
    parent: Option<Uuid>,
    by_parent: &mut HashMap<Option<Uuid>, Vec<DocumentFolder>>,
) -> Vec<FolderTreeDto> {
    let mut level = by_parent.remove(&parent).unwrap_or_default();
    level.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    level
        .into_iter()
        .map(|folder| FolderTreeDto {
            children: build_level(Some(folder.id), by_parent),
            id: folder.id,
            name: folder.name,
            parent_id: folder.parent_id,
        })
        .collect()
}

/// Reject moving `folder_id` under `new_parent_id`.
///
/// `parent_chain` lists `new_parent_id` followed by its ancestors up to the top
/// level. An empty chain means the new parent does not exist.
pub fn check_move(folder_id: Uuid, new_parent_id: Uuid, parent_chain: &[Uuid]) -> Result<()> {
    if parent_chain.is_empty() {
        return Err(AppError::NotFound(format!(
            "Parent folder {} not found",
            new_parent_id
        )));
    }
    if parent_chain.contains(&folder_id) {
        return Err(AppError::BadRequest(
            "A folder cannot be moved into itself or one of its subfolders".to_string(),
        ));
    }
    Ok(())
}

/// Storage key for a document file
pub fn document_key(folder_id: Option<Uuid>, file_id: Uuid, extension: &str) -> String {
    let folder = folder_id.map_or_else(|| "root".to_string(), |id| id.to_string());
    format!("documents/{}/{}.{}", folder, file_id, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn folder(name: &str, parent_id: Option<Uuid>) -> DocumentFolder {
        DocumentFolder {
            id: Uuid::new_v4(),
            parent_id,
            name: name.to_string(),
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_tree_nests_and_sorts() {
        let manuals = folder("Manuals", None);
        let ad = folder("ADs", None);
        let amm = folder("AMM", Some(manuals.id));
        let ipc = folder("ipc", Some(manuals.id));
        let chapter = folder("Chapter 32", Some(amm.id));

        let tree = build_tree(vec![
            chapter.clone(),
            ipc.clone(),
            manuals.clone(),
            amm.clone(),
            ad.clone(),
        ]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "ADs");
        assert_eq!(tree[1].name, "Manuals");

        let children: Vec<&str> = tree[1].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(children, vec!["AMM", "ipc"]);
        assert_eq!(tree[1].children[0].children[0].id, chapter.id);
        assert!(tree[1].children[1].children.is_empty());
    }

    #[test]
    fn test_build_tree_promotes_folders_with_missing_parent() {
        let stray = folder("Stray", Some(Uuid::new_v4()));
        let tree = build_tree(vec![stray.clone()]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, stray.id);
    }

    #[test]
    fn test_check_move() {
        let folder_id = Uuid::new_v4();
        let parent = Uuid::new_v4();
        let grandparent = Uuid::new_v4();

        assert!(check_move(folder_id, parent, &[parent, grandparent]).is_ok());
        assert!(matches!(
            check_move(folder_id, folder_id, &[folder_id]),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            check_move(folder_id, parent, &[parent, folder_id]),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            check_move(folder_id, parent, &[]),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_document_key() {
        let file_id = Uuid::new_v4();
        assert_eq!(
            document_key(None, file_id, "pdf"),
            format!("documents/root/{}.pdf", file_id)
        );
        let folder_id = Uuid::new_v4();
        assert_eq!(
            document_key(Some(folder_id), file_id, "png"),
            format!("documents/{}/{}.png", folder_id, file_id)
        );
    }
}
