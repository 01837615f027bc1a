//! Local state of the create/edit dialog.

use crate::domain::posts::{Post, PostDraft, PostId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(PostId),
}

/// What the dialog asks the board to do when submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmission {
    Create(PostDraft),
    Update(Post),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    NoOpenForm,
    AlreadySubmitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    generation: u64,
    mode: FormMode,
    title: String,
    body: String,
    submitting: bool,
}

impl PostForm {
    pub fn blank(generation: u64) -> Self {
        Self {
            generation,
            mode: FormMode::Create,
            title: String::new(),
            body: String::new(),
            submitting: false,
        }
    }

    /// Seed from an existing post; fields carry its exact current values.
    pub fn seeded(generation: u64, post: &Post) -> Self {
        Self {
            generation,
            mode: FormMode::Edit(post.id),
            title: post.title.clone(),
            body: post.body.clone(),
            submitting: false,
        }
    }

    /// Identifies this opening of the dialog; a reopened dialog gets a new one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Disable the dialog and produce the mutation to run.
    pub fn begin_submit(&mut self) -> Result<FormSubmission, SubmitRejected> {
        if self.submitting {
            return Err(SubmitRejected::AlreadySubmitting);
        }
        self.submitting = true;

        let draft = PostDraft::new(self.title.clone(), self.body.clone());
        Ok(match self.mode {
            FormMode::Create => FormSubmission::Create(draft),
            FormMode::Edit(id) => FormSubmission::Update(draft.into_post(id)),
        })
    }

    /// Re-enable the dialog after a failed submission, keeping the user's edits.
    pub fn submit_failed(&mut self) {
        self.submitting = false;
    }
}
